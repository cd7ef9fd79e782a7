//! Client error types

use shared::order::ValidationError;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connection refused, timeout, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource already exists (duplicate order id)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 2xx response with `success: false`
    #[error("Rejected: {0}")]
    Rejected(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Local storage backend failure. Malformed stored content is not an
/// error; it reads as the default value.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Why an order was not placed. The cart is untouched in every case.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to submit
    #[error("Your cart is empty")]
    EmptyCart,

    /// Missing form fields, raised before any network call
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request did not complete; safe to retry
    #[error("Could not reach the order service: {0}")]
    Network(ClientError),

    /// The backend answered and refused the order
    #[error("{0}")]
    BackendRejected(String),
}

impl CheckoutError {
    /// Whether resubmitting the same cart may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::BackendRejected(_))
    }
}

impl From<ClientError> for CheckoutError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(_) | ClientError::InvalidResponse(_) | ClientError::Serialization(_) => {
                Self::Network(err)
            }
            ClientError::Unauthorized => Self::BackendRejected("Authentication required".to_string()),
            ClientError::Forbidden(msg)
            | ClientError::NotFound(msg)
            | ClientError::Validation(msg)
            | ClientError::Conflict(msg)
            | ClientError::Rejected(msg)
            | ClientError::Internal(msg) => Self::BackendRejected(msg),
        }
    }
}
