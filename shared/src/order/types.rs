//! Order wire types shared by the storefront client and the backend

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Status every freshly placed order starts in
pub const ORDER_STATUS_PLACED: &str = "Placed";

/// Branch used when the customer does not pick one
pub const DEFAULT_BRANCH: &str = "Velvet Brew";

/// Text field limits
pub const MAX_NAME_LEN: usize = 200;
pub const MAX_PHONE_DIGITS: usize = 20;
pub const MAX_ADDRESS_LEN: usize = 500;
pub const MAX_NOTE_LEN: usize = 500;

/// Delivery or Pickup. Affects the address requirement and the fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FulfillmentType {
    #[serde(alias = "delivery")]
    Delivery,
    #[default]
    #[serde(alias = "pickup")]
    Pickup,
}

impl FulfillmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delivery => "Delivery",
            Self::Pickup => "Pickup",
        }
    }

    pub fn is_delivery(&self) -> bool {
        matches!(self, Self::Delivery)
    }

    /// Case-insensitive parse of a stored preference ("delivery", "Pickup", ...)
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "delivery" => Some(Self::Delivery),
            "pickup" => Some(Self::Pickup),
            _ => None,
        }
    }

    /// Default estimate shown when the customer did not pick a branch slot
    pub fn default_eta(&self) -> &'static str {
        match self {
            Self::Delivery => "30–45 mins",
            Self::Pickup => "15–25 mins",
        }
    }
}

impl std::fmt::Display for FulfillmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flattened snapshot of a line item inside an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default = "default_qty")]
    #[validate(range(min = 1, max = 9999))]
    pub qty: u32,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1_000_000.0))]
    pub price: f64,
    #[serde(default)]
    pub options_text: String,
}

fn default_qty() -> u32 {
    1
}

impl OrderItem {
    pub fn new(name: impl Into<String>, qty: u32, price: f64, options_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qty,
            price,
            options_text: options_text.into(),
        }
    }

    pub fn line_total(&self) -> f64 {
        crate::money::round_money(self.price * f64::from(self.qty))
    }
}

/// Order payload posted to `POST /api/orders`.
///
/// Totals are computed client-side; the backend re-derives them and only
/// logs a mismatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    #[validate(length(min = 1, max = 32))]
    pub order_id: String,
    #[validate(length(min = 1, max = 200))]
    pub customer_name: String,
    #[validate(length(min = 1, max = 20))]
    pub phone: String,
    #[serde(rename = "type", alias = "fulfillmentType")]
    pub fulfillment_type: FulfillmentType,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub address: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub branch: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub notes: String,
    #[serde(default = "default_status")]
    pub status: String,
    pub subtotal: f64,
    pub tax: f64,
    #[serde(default)]
    pub delivery_fee: f64,
    pub total: f64,
    #[validate(length(min = 1), nested)]
    pub items: Vec<OrderItem>,
}

fn default_status() -> String {
    ORDER_STATUS_PLACED.to_string()
}

/// Persisted order as returned by `GET /api/orders`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub payload: OrderPayload,
    /// RFC 3339 creation time
    pub created_at: String,
}

/// Query of `GET /api/orders/track`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackQuery {
    pub order_id: String,
    pub phone: String,
}
