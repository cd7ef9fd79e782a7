//! Order submission and read-only projections
//!
//! - Assembly: checkout form validation, order ids, payload building
//! - Snapshot: last-placed-order copy kept for the receipt
//! - Receipt and tracking views derived from snapshots and orders

pub mod assemble;
pub mod receipt;
pub mod snapshot;
pub mod tracking;
pub mod types;

// Re-exports
pub use assemble::{
    CheckoutForm, CustomerDetails, ValidationError, assemble, branch_eta, flatten_items,
    generate_order_id, is_order_id, validate,
};
pub use receipt::{ReceiptLine, ReceiptView, render_receipt};
pub use snapshot::OrderSnapshot;
pub use tracking::{
    StatusView, StepState, StepView, TrackedOrder, TrackingStatus, lookup_matches,
    render_tracking_status,
};
pub use types::*;
