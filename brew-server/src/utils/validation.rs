//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement.

use shared::order::{FulfillmentType, OrderPayload};
use validator::{Validate, ValidationErrors};

use crate::utils::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: menu items, categories, customer names
pub const MAX_NAME_LEN: usize = 200;

/// Notes and descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: category keys, phone numbers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Highest accepted menu price
pub const MAX_PRICE: f64 = 1_000_000.0;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::required_field(field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(value: &Option<String>, field: &str, max_len: usize) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Parse a price field: finite, non-negative, bounded.
pub fn parse_price(raw: &str) -> Result<f64, AppError> {
    let price: f64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::with_message(ErrorCode::InvalidPrice, format!("Invalid price: {raw}")))?;
    if !price.is_finite() || !(0.0..=MAX_PRICE).contains(&price) {
        return Err(AppError::with_message(
            ErrorCode::InvalidPrice,
            format!("Price must be between 0 and {MAX_PRICE}"),
        ));
    }
    Ok(price)
}

// ── Validation helpers (Orders) ─────────────────────────────────────

/// Validate an incoming order.
///
/// Field rules come from the payload's `Validate` derive; on top of those
/// the customer fields must not be blank and delivery orders need an address.
pub fn validate_order(payload: &OrderPayload) -> Result<(), AppError> {
    validate_required_text(&payload.order_id, "orderId", MAX_SHORT_TEXT_LEN)?;
    if payload.customer_name.trim().is_empty() || payload.phone.trim().is_empty() {
        return Err(AppError::new(ErrorCode::MissingCustomerInfo));
    }
    if payload.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    if payload.fulfillment_type == FulfillmentType::Delivery && payload.address.trim().is_empty() {
        return Err(AppError::new(ErrorCode::MissingAddress));
    }
    payload.validate().map_err(from_validation_errors)?;

    let amounts = [payload.subtotal, payload.tax, payload.delivery_fee, payload.total];
    if amounts.iter().any(|a| !a.is_finite() || *a < 0.0) {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "Order amounts must be non-negative numbers",
        ));
    }
    if payload.items.iter().any(|i| !i.price.is_finite()) {
        return Err(AppError::with_message(ErrorCode::InvalidPrice, "Item price must be a number"));
    }
    Ok(())
}

/// Flatten validator errors into an AppError listing the offending fields
pub fn from_validation_errors(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<String> = collect_fields(&errors, "");
    fields.sort();
    AppError::validation(format!("Invalid fields: {}", fields.join(", "))).with_detail("fields", fields)
}

fn collect_fields(errors: &ValidationErrors, prefix: &str) -> Vec<String> {
    use validator::ValidationErrorsKind;

    let mut out = Vec::new();
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(_) => out.push(path),
            ValidationErrorsKind::Struct(inner) => out.extend(collect_fields(inner, &path)),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    out.extend(collect_fields(inner, &format!("{path}[{index}]")));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::OrderItem;

    fn payload() -> OrderPayload {
        OrderPayload {
            order_id: "VB-12345".into(),
            customer_name: "Sana".into(),
            phone: "03001234567".into(),
            fulfillment_type: FulfillmentType::Pickup,
            address: String::new(),
            branch: "Velvet Brew".into(),
            notes: String::new(),
            status: "Placed".into(),
            subtotal: 10.0,
            tax: 0.8,
            delivery_fee: 0.0,
            total: 10.8,
            items: vec![OrderItem::new("Velvet Latte", 2, 5.0, "Standard")],
        }
    }

    #[test]
    fn test_valid_order() {
        assert!(validate_order(&payload()).is_ok());
    }

    #[test]
    fn test_missing_customer_info() {
        let mut p = payload();
        p.phone = "  ".into();
        assert_eq!(validate_order(&p).unwrap_err().code, ErrorCode::MissingCustomerInfo);
    }

    #[test]
    fn test_delivery_requires_address() {
        let mut p = payload();
        p.fulfillment_type = FulfillmentType::Delivery;
        assert_eq!(validate_order(&p).unwrap_err().code, ErrorCode::MissingAddress);
        p.address = "Block C".into();
        assert!(validate_order(&p).is_ok());
    }

    #[test]
    fn test_empty_items() {
        let mut p = payload();
        p.items.clear();
        assert_eq!(validate_order(&p).unwrap_err().code, ErrorCode::OrderEmpty);
    }

    #[test]
    fn test_nested_item_rules() {
        let mut p = payload();
        p.items.push(OrderItem::new("", 0, 1.0, ""));
        let err = validate_order(&p).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.message.contains("items[1].name"));
        assert!(err.message.contains("items[1].qty"));
    }

    #[test]
    fn test_negative_amounts() {
        let mut p = payload();
        p.total = -1.0;
        assert_eq!(validate_order(&p).unwrap_err().code, ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price(" 4.50 ").unwrap(), 4.5);
        assert_eq!(parse_price("0").unwrap(), 0.0);
        assert_eq!(parse_price("-1").unwrap_err().code, ErrorCode::InvalidPrice);
        assert_eq!(parse_price("NaN").unwrap_err().code, ErrorCode::InvalidPrice);
        assert_eq!(parse_price("abc").unwrap_err().code, ErrorCode::InvalidPrice);
    }

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Latte", "name", MAX_NAME_LEN).is_ok());
        assert_eq!(
            validate_required_text(" ", "name", MAX_NAME_LEN).unwrap_err().code,
            ErrorCode::RequiredField
        );
        assert_eq!(
            validate_required_text(&"x".repeat(300), "name", MAX_NAME_LEN).unwrap_err().code,
            ErrorCode::ValidationFailed
        );
        assert!(validate_optional_text(&None, "description", MAX_NOTE_LEN).is_ok());
    }
}
