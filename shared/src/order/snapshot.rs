//! Last-placed-order snapshot kept by the client for the receipt page

use super::assemble::CustomerDetails;
use super::types::{FulfillmentType, OrderItem, OrderPayload};
use crate::cart::{EmptyLabel, LineOptions, MAX_QUANTITY, describe_options};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Immutable copy of a submitted order, independent of later cart changes.
///
/// Deserialization is lenient: numeric fields of the wrong type read as
/// absent and items are coerced the same way persisted carts are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderSnapshot {
    pub order_id: String,
    pub phone: String,
    pub customer_name: String,
    /// "Delivery" or "Pickup"; absent reads as Delivery
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub fulfillment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta: Option<String>,
    pub branch: String,
    pub address: String,
    pub notes: String,
    #[serde(deserialize_with = "number_or_none", skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<f64>,
    #[serde(deserialize_with = "number_or_zero")]
    pub subtotal: f64,
    #[serde(deserialize_with = "number_or_zero")]
    pub tax: f64,
    #[serde(deserialize_with = "number_or_zero")]
    pub delivery_fee: f64,
    #[serde(deserialize_with = "number_or_zero")]
    pub total: f64,
    #[serde(deserialize_with = "lenient_items")]
    pub items: Vec<OrderItem>,
}

impl OrderSnapshot {
    /// Snapshot of a payload the backend accepted
    pub fn from_payload(payload: &OrderPayload, details: &CustomerDetails, tax_rate: f64) -> Self {
        Self {
            order_id: payload.order_id.clone(),
            phone: payload.phone.clone(),
            customer_name: payload.customer_name.clone(),
            fulfillment: Some(payload.fulfillment_type.as_str().to_string()),
            eta: Some(details.eta.clone()),
            branch: payload.branch.clone(),
            address: payload.address.clone(),
            notes: payload.notes.clone(),
            tax_rate: Some(tax_rate),
            subtotal: payload.subtotal,
            tax: payload.tax,
            delivery_fee: payload.delivery_fee,
            total: payload.total,
            items: payload.items.clone(),
        }
    }

    pub fn fulfillment(&self) -> FulfillmentType {
        match self.fulfillment.as_deref() {
            None => FulfillmentType::Delivery,
            Some(raw) => FulfillmentType::parse(raw).unwrap_or(FulfillmentType::Pickup),
        }
    }
}

fn number_or_none<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(value.as_f64().filter(|n| n.is_finite()))
}

fn number_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(number_or_none(d)?.unwrap_or(0.0))
}

fn lenient_items<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<OrderItem>, D::Error> {
    let value = Value::deserialize(d)?;
    let Some(entries) = value.as_array() else {
        return Ok(Vec::new());
    };
    Ok(entries.iter().filter_map(lenient_item).collect())
}

fn lenient_item(raw: &Value) -> Option<OrderItem> {
    let obj = raw.as_object()?;
    let number = |key: &str| {
        let n = match obj.get(key) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        n.filter(|n| n.is_finite())
    };

    let qty = number("qty").map(f64::floor).filter(|q| *q >= 1.0).unwrap_or(1.0);
    let options = obj.get("options").map(LineOptions::normalize).unwrap_or_default();
    let options_text = obj.get("optionsText").and_then(Value::as_str);

    Some(OrderItem {
        name: obj
            .get("name")
            .and_then(Value::as_str)
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("Item")
            .to_string(),
        qty: (qty as u32).min(MAX_QUANTITY),
        price: number("price").filter(|p| *p >= 0.0).unwrap_or(0.0),
        options_text: describe_options(&options, options_text, EmptyLabel::Blank),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lenient_fields() {
        let snapshot: OrderSnapshot = serde_json::from_value(json!({
            "orderId": "VB-55555",
            "taxRate": "0.08",
            "subtotal": "abc",
            "items": [
                { "name": "Latte", "qty": "2", "price": 5 },
                { "qty": 0, "price": -1, "options": { "size": "Small", "extras": ["Shot"] } },
                "junk"
            ]
        }))
        .unwrap();

        assert_eq!(snapshot.tax_rate, None);
        assert_eq!(snapshot.subtotal, 0.0);
        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(snapshot.items[0].qty, 2);
        assert_eq!(snapshot.items[1].name, "Item");
        assert_eq!(snapshot.items[1].qty, 1);
        assert_eq!(snapshot.items[1].price, 0.0);
        assert_eq!(snapshot.items[1].options_text, "Small, Shot");
    }

    #[test]
    fn test_items_not_a_list() {
        let snapshot: OrderSnapshot = serde_json::from_value(json!({ "items": {} })).unwrap();
        assert!(snapshot.items.is_empty());
    }

    #[test]
    fn test_fulfillment_defaults() {
        let mut snapshot = OrderSnapshot::default();
        assert_eq!(snapshot.fulfillment(), FulfillmentType::Delivery);
        snapshot.fulfillment = Some("pickup".into());
        assert_eq!(snapshot.fulfillment(), FulfillmentType::Pickup);
        snapshot.fulfillment = Some("teleport".into());
        assert_eq!(snapshot.fulfillment(), FulfillmentType::Pickup);
    }
}
