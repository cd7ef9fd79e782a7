//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 存活检查
//! - [`menu`] - 菜单接口 (读取公开, 写入需登录)
//! - [`orders`] - 订单接口 (下单与查询公开, 列表需登录)
//! - [`admin`] - 管理员登录

pub mod admin;
pub mod health;
pub mod menu;
pub mod orders;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};
