//! Shared types for Velvet Brew
//!
//! Domain logic used by both the storefront client and the backend:
//! cart line items, totals, order assembly, receipt and tracking
//! projections, wire models and the unified error types.

pub mod cart;
pub mod error;
pub mod models;
pub mod money;
pub mod order;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use cart::{LineItem, LineOptions};
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use money::{PricingConfig, Totals};
pub use order::{FulfillmentType, OrderPayload};
