//! Totals calculation using rust_decimal for precision
//!
//! All arithmetic is done on `Decimal`; results are converted back to `f64`
//! (rounded half-up to cents) for display and serialization.

use crate::cart::LineItem;
use crate::order::{FulfillmentType, OrderItem};
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// Rounding precision for monetary values
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Sales tax applied when nothing else is configured
pub const DEFAULT_TAX_RATE: f64 = 0.08;

/// Flat fee for delivery orders
pub const DEFAULT_DELIVERY_FEE: f64 = 1.50;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64, rounded to 2 decimal places (half-up)
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_decimal(value).to_f64().unwrap_or_default()
}

#[inline]
fn round_decimal(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Round an f64 amount to cents
#[inline]
pub fn round_money(value: f64) -> f64 {
    to_f64(to_decimal(value))
}

/// Compare two amounts within [`MONEY_TOLERANCE`]
pub fn money_eq(a: f64, b: f64) -> bool {
    let diff = (to_decimal(a) - to_decimal(b)).abs();
    diff < MONEY_TOLERANCE
}

/// Anything with a unit price and a quantity
pub trait Priced {
    fn unit_price(&self) -> f64;
    fn quantity(&self) -> u32;
}

impl Priced for LineItem {
    fn unit_price(&self) -> f64 {
        self.unit_price
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }
}

impl Priced for OrderItem {
    fn unit_price(&self) -> f64 {
        self.price
    }

    fn quantity(&self) -> u32 {
        self.qty
    }
}

/// Fulfillment-dependent fee rule
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FeeSchedule {
    /// No fee for any fulfillment
    #[default]
    None,
    /// Flat amount for delivery orders with a non-zero subtotal
    FlatDelivery(f64),
}

impl FeeSchedule {
    pub fn flat_delivery(amount: f64) -> Self {
        Self::FlatDelivery(amount)
    }

    fn fee(&self, fulfillment: FulfillmentType, subtotal: Decimal) -> Decimal {
        match (self, fulfillment) {
            (Self::FlatDelivery(amount), FulfillmentType::Delivery) if subtotal > Decimal::ZERO => {
                round_decimal(to_decimal(*amount))
            }
            _ => Decimal::ZERO,
        }
    }
}

/// Tax rate and fee schedule used by every totals computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingConfig {
    pub tax_rate: f64,
    pub fee_schedule: FeeSchedule,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: DEFAULT_TAX_RATE,
            fee_schedule: FeeSchedule::FlatDelivery(DEFAULT_DELIVERY_FEE),
        }
    }
}

impl PricingConfig {
    pub fn new(tax_rate: f64, fee_schedule: FeeSchedule) -> Self {
        Self { tax_rate, fee_schedule }
    }

    pub fn with_tax_rate(mut self, tax_rate: f64) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    pub fn with_fee_schedule(mut self, fee_schedule: FeeSchedule) -> Self {
        self.fee_schedule = fee_schedule;
        self
    }
}

/// Derived cart figures. Never stored on their own.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub fee: f64,
    pub total: f64,
    pub item_count: u32,
}

/// Compute subtotal, tax, fee and total for a set of lines.
///
/// Subtotal and tax are each rounded to cents before being summed with the
/// fee; the sum is rounded again. An empty input yields all zeros.
pub fn compute_totals<T: Priced>(
    lines: &[T],
    fulfillment: FulfillmentType,
    pricing: &PricingConfig,
) -> Totals {
    let mut subtotal = Decimal::ZERO;
    let mut item_count: u32 = 0;
    for line in lines {
        let qty = line.quantity();
        subtotal += to_decimal(line.unit_price()) * Decimal::from(qty);
        item_count = item_count.saturating_add(qty);
    }

    let tax = subtotal * to_decimal(pricing.tax_rate);
    let fee = pricing.fee_schedule.fee(fulfillment, subtotal);

    let subtotal = round_decimal(subtotal);
    let tax = round_decimal(tax);
    let total = subtotal + tax + fee;

    Totals {
        subtotal: to_f64(subtotal),
        tax: to_f64(tax),
        fee: to_f64(fee),
        total: to_f64(total),
        item_count,
    }
}

/// Sum of quantities, the number shown on the cart badge
pub fn item_count<T: Priced>(lines: &[T]) -> u32 {
    lines.iter().fold(0u32, |acc, l| acc.saturating_add(l.quantity()))
}
