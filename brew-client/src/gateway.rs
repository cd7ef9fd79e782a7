//! Order persistence collaborator

use crate::{ClientResult, HttpClient};
use async_trait::async_trait;
use shared::order::OrderPayload;

/// Backend that accepts placed orders.
///
/// `Ok` carries the backend's optional confirmation message. A non-2xx
/// status or `success: false` is an error.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn submit_order(&self, payload: &OrderPayload) -> ClientResult<Option<String>>;
}

#[async_trait]
impl OrderGateway for HttpClient {
    async fn submit_order(&self, payload: &OrderPayload) -> ClientResult<Option<String>> {
        HttpClient::submit_order(self, payload).await
    }
}
