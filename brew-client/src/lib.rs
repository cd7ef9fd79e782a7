//! Brew Client - storefront session for the Velvet Brew API
//!
//! Owns the persisted cart, submits orders and talks to the REST backend.

pub mod admin;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod menu;
pub mod storage;
pub mod upsell;

pub use admin::{AdminSession, ImageUpload, MenuItemDraft};
pub use cart::{CartState, CartStore};
pub use checkout::{CheckoutService, PlacedOrder};
pub use config::ClientConfig;
pub use error::{CheckoutError, ClientError, ClientResult, StorageError, StorageResult};
pub use gateway::OrderGateway;
pub use http::HttpClient;
pub use menu::MenuCatalog;
pub use storage::{FileStorage, MemoryStorage, Storage};

// Re-export shared types for convenience
pub use shared::ApiResponse;
pub use shared::order::{CheckoutForm, FulfillmentType, OrderSnapshot};
