//! Tolerant re-hydration of persisted carts

use super::line_item::{LINE_ID_SEPARATOR, LineItem, compute_line_id, is_composite_id};
use super::options::LineOptions;
use crate::money::round_money;
use serde_json::{Map, Value};

/// Upper bound for a single line's quantity
pub const MAX_QUANTITY: u32 = 9999;

const DEFAULT_NAME: &str = "Item";

/// Keys older storefront builds used for the product reference, in priority order
const PRODUCT_ID_KEYS: [&str; 4] = ["productId", "productID", "baseId", "sku"];

/// Rebuild a cart from whatever was found in storage.
///
/// - a non-array value yields an empty cart
/// - non-object entries and entries with a quantity below 1 are dropped
/// - missing fields get defaults, numbers may arrive as strings
/// - entries without a composite `product|options` id get one computed
/// - entries sharing a line id are merged, first position wins
///
/// Normalizing an already normalized cart returns it unchanged.
pub fn normalize_cart(raw: &Value) -> Vec<LineItem> {
    let Some(entries) = raw.as_array() else {
        if !raw.is_null() {
            tracing::debug!("Persisted cart is not a list, starting empty");
        }
        return Vec::new();
    };

    let mut lines: Vec<LineItem> = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(line) = entry.as_object().and_then(normalize_line) else {
            continue;
        };
        match lines.iter_mut().find(|l| l.line_id == line.line_id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(line.quantity).min(MAX_QUANTITY);
            }
            None => lines.push(line),
        }
    }
    lines
}

fn normalize_line(obj: &Map<String, Value>) -> Option<LineItem> {
    let quantity = match coerce_number(obj.get("qty")) {
        None => 1,
        Some(q) if q.floor() < 1.0 => return None,
        Some(q) => (q.floor() as u32).min(MAX_QUANTITY),
    };

    let stored_id = text_field(obj, "id");
    let product_id = PRODUCT_ID_KEYS
        .iter()
        .find_map(|key| text_field(obj, key))
        .or_else(|| {
            stored_id
                .as_deref()
                .map(|id| id.split(LINE_ID_SEPARATOR).next().unwrap_or(id).to_string())
        })
        .unwrap_or_default();

    let unit_price = coerce_number(obj.get("price"))
        .filter(|p| *p >= 0.0)
        .map(round_money)
        .unwrap_or(0.0);

    let options = obj.get("options").map(LineOptions::normalize).unwrap_or_default();
    let options_text = text_field(obj, "optionsText");

    let line_id = match stored_id {
        Some(id) if is_composite_id(&id) => id,
        _ => {
            let id = compute_line_id(&product_id, &options, options_text.as_deref());
            tracing::debug!(line_id = %id, "Migrated legacy cart entry");
            id
        }
    };

    Some(LineItem {
        line_id,
        product_id,
        name: text_field(obj, "name").unwrap_or_else(|| DEFAULT_NAME.to_string()),
        unit_price,
        quantity,
        image: text_field(obj, "image"),
        options,
        options_text,
    })
}

/// Number or numeric string, finite only
fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

/// Non-blank string (trimmed) or a number rendered as text
fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
