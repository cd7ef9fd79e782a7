//! Order API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// | 路径 | 方法 | 认证 |
/// |------|------|------|
/// | /api/orders | POST | 无 |
/// | /api/orders | GET | 管理员 |
/// | /api/orders/track | GET | 无 |
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/orders", get(handler::list).post(handler::create))
        .route("/api/orders/track", get(handler::track))
}
