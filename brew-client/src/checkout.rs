//! Order submission
//!
//! Turns the current cart and checkout form into an order payload, hands it
//! to the order gateway and, on acceptance, records the receipt snapshot and
//! empties the cart. Any failure leaves the cart untouched.
//!
//! The order id doubles as an idempotency key: a payload whose outcome is
//! unknown (transport failure, 5xx) is kept, and resubmitting the same cart
//! reuses its id. The backend rejects duplicate ids with 409, which on such
//! a retry means the earlier attempt already went through.

use crate::cart::CartStore;
use crate::error::{CheckoutError, ClientError};
use crate::gateway::OrderGateway;
use crate::storage::Storage;
use shared::money::PricingConfig;
use shared::order::{CheckoutForm, OrderPayload, OrderSnapshot, assemble, generate_order_id, validate};

const DEFAULT_CONFIRMATION: &str = "Order placed successfully";

/// Result of an accepted order
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    pub order_id: String,
    pub snapshot: OrderSnapshot,
    /// Backend confirmation, or a default message
    pub message: String,
}

pub struct CheckoutService<G: OrderGateway> {
    gateway: G,
    pricing: PricingConfig,
    /// Last payload whose outcome is unknown
    pending: Option<OrderPayload>,
}

impl<G: OrderGateway> CheckoutService<G> {
    pub fn new(gateway: G) -> Self {
        Self::with_pricing(gateway, PricingConfig::default())
    }

    pub fn with_pricing(gateway: G, pricing: PricingConfig) -> Self {
        Self {
            gateway,
            pricing,
            pending: None,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    /// Order id held for a retry, if the last attempt ended ambiguously
    pub fn pending_order_id(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.order_id.as_str())
    }

    /// Validate, assemble and submit the cart as an order.
    ///
    /// Taking `&mut self` keeps one submission in flight per service.
    pub async fn place_order<S: Storage>(
        &mut self,
        cart: &mut CartStore<S>,
        form: &CheckoutForm,
    ) -> Result<PlacedOrder, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let fulfillment = cart.fulfillment();
        let details = validate(form, fulfillment)?;
        let totals = cart.totals(fulfillment, &self.pricing);

        let mut payload = assemble(cart.lines(), &details, &totals, generate_order_id());
        let is_retry = match self.pending.take() {
            Some(pending) if same_order(&pending, &payload) => {
                payload.order_id = pending.order_id;
                true
            }
            _ => false,
        };

        tracing::info!(
            order_id = %payload.order_id,
            retry = is_retry,
            total = payload.total,
            "Submitting order"
        );

        let message = match self.gateway.submit_order(&payload).await {
            Ok(message) => message,
            Err(ClientError::Conflict(_)) if is_retry => {
                tracing::info!(order_id = %payload.order_id, "Order already recorded by an earlier attempt");
                None
            }
            Err(e) => {
                if outcome_unknown(&e) {
                    tracing::warn!(order_id = %payload.order_id, error = %e, "Order submission failed, keeping payload for retry");
                    self.pending = Some(payload);
                } else {
                    tracing::warn!(order_id = %payload.order_id, error = %e, "Order rejected");
                }
                return Err(e.into());
            }
        };

        // Accepted: local write failures must not surface as a failed order
        if let Err(e) = cart.clear() {
            tracing::warn!(order_id = %payload.order_id, error = %e, "Failed to persist cleared cart");
        }
        let snapshot = OrderSnapshot::from_payload(&payload, &details, self.pricing.tax_rate);
        if let Err(e) = cart.save_last_order(&snapshot) {
            tracing::warn!(order_id = %payload.order_id, error = %e, "Failed to save order snapshot");
        }

        tracing::info!(order_id = %payload.order_id, "Order placed");
        Ok(PlacedOrder {
            order_id: payload.order_id,
            snapshot,
            message: message.unwrap_or_else(|| DEFAULT_CONFIRMATION.to_string()),
        })
    }
}

/// Payloads equal in everything but the order id
fn same_order(pending: &OrderPayload, fresh: &OrderPayload) -> bool {
    OrderPayload {
        order_id: fresh.order_id.clone(),
        ..pending.clone()
    } == *fresh
}

/// Whether the backend may have stored the order despite the error
fn outcome_unknown(err: &ClientError) -> bool {
    matches!(
        err,
        ClientError::Http(_) | ClientError::InvalidResponse(_) | ClientError::Serialization(_) | ClientError::Internal(_)
    )
}
