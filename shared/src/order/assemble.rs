//! Checkout form validation and order payload assembly

use super::types::{DEFAULT_BRANCH, FulfillmentType, ORDER_STATUS_PLACED, OrderItem, OrderPayload};
use crate::cart::{EmptyLabel, LineItem};
use crate::error::{AppError, ErrorCode};
use crate::money::Totals;
use crate::util::digits_only;
use rand::Rng;
use thiserror::Error;

/// Prefix of human-readable order ids
pub const ORDER_ID_PREFIX: &str = "VB-";

const ORDER_NUMBER_MIN: u32 = 10_000;
const ORDER_NUMBER_MAX: u32 = 99_999;

/// Raw checkout form as typed by the customer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub branch: String,
    pub notes: String,
    /// Estimate picked in the form; falls back to the fulfillment default
    pub eta: Option<String>,
}

/// Missing required checkout fields. The customer corrects and resubmits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter your name and phone number")]
    MissingCustomerInfo,
    #[error("Please enter your delivery address")]
    MissingAddress,
}

impl ValidationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingCustomerInfo => ErrorCode::MissingCustomerInfo,
            Self::MissingAddress => ErrorCode::MissingAddress,
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::with_message(err.code(), err.to_string())
    }
}

/// Form data after validation: trimmed, phone reduced to digits, branch and
/// ETA defaulted, address dropped for pickup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDetails {
    pub customer_name: String,
    pub phone: String,
    pub fulfillment: FulfillmentType,
    pub address: String,
    pub branch: String,
    pub notes: String,
    pub eta: String,
}

/// Check the required fields for the chosen fulfillment.
///
/// The phone is stripped to digits first, so a phone made only of
/// punctuation counts as missing.
pub fn validate(form: &CheckoutForm, fulfillment: FulfillmentType) -> Result<CustomerDetails, ValidationError> {
    let customer_name = form.customer_name.trim();
    let phone = digits_only(&form.phone);
    if customer_name.is_empty() || phone.is_empty() {
        return Err(ValidationError::MissingCustomerInfo);
    }

    let address = match fulfillment {
        FulfillmentType::Delivery => {
            let address = form.address.trim();
            if address.is_empty() {
                return Err(ValidationError::MissingAddress);
            }
            address.to_string()
        }
        FulfillmentType::Pickup => String::new(),
    };

    let branch = match form.branch.trim() {
        "" => DEFAULT_BRANCH,
        b => b,
    };

    let eta = form
        .eta
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .unwrap_or(fulfillment.default_eta());

    Ok(CustomerDetails {
        customer_name: customer_name.to_string(),
        phone,
        fulfillment,
        address,
        branch: branch.to_string(),
        notes: form.notes.trim().to_string(),
        eta: eta.to_string(),
    })
}

/// Estimate for a branch, used to prefill the ETA when the branch changes
pub fn branch_eta(branch: &str) -> &'static str {
    if branch.contains("Gulberg") {
        "25–35 mins"
    } else {
        "30–45 mins"
    }
}

/// `VB-` followed by a number drawn uniformly from 10000..=99999.
///
/// Uniqueness is advisory; the backend rejects duplicates.
pub fn generate_order_id() -> String {
    generate_order_id_with(&mut rand::thread_rng())
}

pub fn generate_order_id_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let number = rng.gen_range(ORDER_NUMBER_MIN..=ORDER_NUMBER_MAX);
    format!("{ORDER_ID_PREFIX}{number}")
}

/// Whether `id` has the `VB-NNNNN` shape
pub fn is_order_id(id: &str) -> bool {
    id.strip_prefix(ORDER_ID_PREFIX)
        .is_some_and(|n| n.len() == 5 && n.bytes().all(|b| b.is_ascii_digit()))
}

/// Flatten cart lines into order items. Raw options never leave the
/// client, only their "Standard"-defaulted rendering.
pub fn flatten_items(lines: &[LineItem]) -> Vec<OrderItem> {
    lines
        .iter()
        .map(|line| OrderItem {
            name: line.name.clone(),
            qty: line.quantity,
            price: line.unit_price,
            options_text: line.describe_options(EmptyLabel::Standard),
        })
        .collect()
}

/// Build the order payload from a cart snapshot, validated customer
/// details and the totals computed for that cart.
pub fn assemble(
    lines: &[LineItem],
    details: &CustomerDetails,
    totals: &Totals,
    order_id: impl Into<String>,
) -> OrderPayload {
    OrderPayload {
        order_id: order_id.into(),
        customer_name: details.customer_name.clone(),
        phone: details.phone.clone(),
        fulfillment_type: details.fulfillment,
        address: details.address.clone(),
        branch: details.branch.clone(),
        notes: details.notes.clone(),
        status: ORDER_STATUS_PLACED.to_string(),
        subtotal: totals.subtotal,
        tax: totals.tax,
        delivery_fee: totals.fee,
        total: totals.total,
        items: flatten_items(lines),
    }
}
