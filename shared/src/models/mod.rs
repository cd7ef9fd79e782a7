//! Data models shared by the storefront client and the backend

pub mod admin;
pub mod menu_item;

pub use admin::{LoginRequest, LoginResponse};
pub use menu_item::{DEFAULT_DESCRIPTION, MenuItem, MenuSection};
