//! Order tracking status projection

use super::types::{DEFAULT_BRANCH, Order, OrderItem, TrackQuery};
use crate::util::digits_only;
use serde::{Deserialize, Serialize};

/// Rider assigned once an order leaves the branch
pub const DEFAULT_RIDER: &str = "Adeel";

const UNASSIGNED_RIDER: &str = "Not assigned";

/// Fixed progression of an order. `Delivered` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingStatus {
    Confirmed,
    Preparing,
    Out,
    Delivered,
}

impl TrackingStatus {
    pub const ALL: [TrackingStatus; 4] = [Self::Confirmed, Self::Preparing, Self::Out, Self::Delivered];

    /// Parse a status key. The backend's initial `Placed` reads as confirmed.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "confirmed" | "placed" => Some(Self::Confirmed),
            "preparing" => Some(Self::Preparing),
            "out" => Some(Self::Out),
            "delivered" => Some(Self::Delivered),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Out => "out",
            Self::Delivered => "delivered",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Confirmed => "Confirmed",
            Self::Preparing => "Preparing",
            Self::Out => "Out for delivery",
            Self::Delivered => "Delivered",
        }
    }

    pub fn caption(&self) -> &'static str {
        match self {
            Self::Confirmed => "Order received",
            Self::Preparing => "Barista crafting",
            Self::Out => "On the way",
            Self::Delivered => "Enjoy",
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            Self::Confirmed => "We received your order and it is queued for preparation.",
            Self::Preparing => "Your barista is crafting your drink.",
            Self::Out => "Your rider is on the way with your order.",
            Self::Delivered => "Your order has arrived. Enjoy your Velvet Brew.",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Confirmed => Self::Preparing,
            Self::Preparing => Self::Out,
            Self::Out | Self::Delivered => Self::Delivered,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepState {
    Done,
    Active,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub key: TrackingStatus,
    pub label: &'static str,
    pub caption: &'static str,
    pub state: StepState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub title: &'static str,
    pub line: &'static str,
    pub steps: Vec<StepView>,
    pub branch: String,
    pub rider: String,
    /// `tel:` target, absent when the branch has no phone
    pub branch_phone: Option<String>,
    pub item_count: u32,
    pub items: Vec<OrderItem>,
}

/// Order as served by `GET /api/orders/track`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedOrder {
    pub order_id: String,
    pub phone: String,
    /// Status key; unknown values render as a not-yet-started order
    pub status: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rider: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl TrackedOrder {
    /// Simulated refresh: move one step forward and assign a rider once out.
    /// Unknown statuses jump to delivered.
    pub fn advance(&mut self) {
        let next = TrackingStatus::parse(&self.status)
            .map(|s| s.next())
            .unwrap_or(TrackingStatus::Delivered);
        self.status = next.as_str().to_string();

        let unassigned = self.rider.as_deref().is_none_or(|r| r.trim().is_empty());
        if matches!(next, TrackingStatus::Out | TrackingStatus::Delivered) && unassigned {
            self.rider = Some(DEFAULT_RIDER.to_string());
        }
    }
}

impl From<&Order> for TrackedOrder {
    fn from(order: &Order) -> Self {
        let p = &order.payload;
        let status = TrackingStatus::parse(&p.status)
            .map(|s| s.as_str().to_string())
            .unwrap_or_else(|| p.status.clone());
        Self {
            order_id: p.order_id.clone(),
            phone: p.phone.clone(),
            status,
            branch: p.branch.clone(),
            branch_phone: None,
            rider: None,
            items: p.items.clone(),
        }
    }
}

/// Tracking lookup rule: order id compared case-insensitively, phones by digits
pub fn lookup_matches(order_id: &str, phone: &str, query: &TrackQuery) -> bool {
    let wanted = digits_only(&query.phone);
    order_id.trim().eq_ignore_ascii_case(query.order_id.trim())
        && !wanted.is_empty()
        && digits_only(phone) == wanted
}

/// Map an order's status onto the fixed progression.
///
/// Steps before the current one are done, the current one is active, the
/// rest are pending. An unknown status shows the confirmed copy with every
/// step pending.
pub fn render_tracking_status(order: &TrackedOrder) -> StatusView {
    let current = TrackingStatus::parse(&order.status);
    let copy = current.unwrap_or(TrackingStatus::Confirmed);

    let steps = TrackingStatus::ALL
        .iter()
        .map(|step| {
            let state = match current {
                Some(c) if step.index() < c.index() => StepState::Done,
                Some(c) if step.index() == c.index() => StepState::Active,
                _ => StepState::Pending,
            };
            StepView {
                key: *step,
                label: step.label(),
                caption: step.caption(),
                state,
            }
        })
        .collect();

    let branch = match order.branch.trim() {
        "" => DEFAULT_BRANCH.to_string(),
        b => b.to_string(),
    };

    StatusView {
        title: copy.label(),
        line: copy.headline(),
        steps,
        branch,
        rider: order
            .rider
            .clone()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| UNASSIGNED_RIDER.to_string()),
        branch_phone: order.branch_phone.clone().filter(|p| !p.trim().is_empty()),
        item_count: crate::money::item_count(&order.items),
        items: order.items.clone(),
    }
}
