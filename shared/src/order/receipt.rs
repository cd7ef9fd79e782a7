//! Read-only receipt projection of an order snapshot

use super::snapshot::OrderSnapshot;
use super::types::{DEFAULT_BRANCH, FulfillmentType, TrackQuery};
use crate::money::{DEFAULT_TAX_RATE, FeeSchedule, PricingConfig, Totals, compute_totals};
use crate::util::digits_only;
use serde::Serialize;

/// Order id shown when the snapshot has none
pub const PLACEHOLDER_ORDER_ID: &str = "VB-00000";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub name: String,
    pub qty: u32,
    pub options_text: String,
    pub line_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptView {
    pub order_id: String,
    pub fulfillment: FulfillmentType,
    pub eta: String,
    pub branch: String,
    /// Only for delivery orders with an address
    pub address: Option<String>,
    pub lines: Vec<ReceiptLine>,
    pub totals: Totals,
    /// Prefilled query for the tracking page
    pub track: TrackQuery,
}

/// Project a snapshot into a receipt.
///
/// Totals are recomputed from the items with the snapshot's tax rate (or
/// the default) and its delivery fee; cached totals are not trusted.
pub fn render_receipt(snapshot: &OrderSnapshot) -> ReceiptView {
    let fulfillment = snapshot.fulfillment();

    let fee_schedule = if snapshot.delivery_fee > 0.0 {
        FeeSchedule::FlatDelivery(snapshot.delivery_fee)
    } else {
        FeeSchedule::None
    };
    let pricing = PricingConfig::new(snapshot.tax_rate.unwrap_or(DEFAULT_TAX_RATE), fee_schedule);
    let totals = compute_totals(&snapshot.items, fulfillment, &pricing);

    let order_id = non_blank(&snapshot.order_id).unwrap_or(PLACEHOLDER_ORDER_ID).to_string();
    let address = match fulfillment {
        FulfillmentType::Delivery => non_blank(&snapshot.address).map(str::to_string),
        FulfillmentType::Pickup => None,
    };

    ReceiptView {
        track: TrackQuery {
            order_id: snapshot.order_id.clone(),
            phone: digits_only(&snapshot.phone),
        },
        order_id,
        fulfillment,
        eta: snapshot
            .eta
            .as_deref()
            .and_then(non_blank)
            .unwrap_or(fulfillment.default_eta())
            .to_string(),
        branch: non_blank(&snapshot.branch).unwrap_or(DEFAULT_BRANCH).to_string(),
        address,
        lines: snapshot
            .items
            .iter()
            .map(|it| ReceiptLine {
                name: it.name.clone(),
                qty: it.qty,
                options_text: it.options_text.clone(),
                line_total: it.line_total(),
            })
            .collect(),
        totals,
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}
