//! Menu API 模块
//!
//! 写操作使用 multipart 表单, 图片随表单一起上传

mod handler;
mod upload;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

/// | 路径 | 方法 | 认证 |
/// |------|------|------|
/// | /api/menu | GET | 无 |
/// | /api/menu | POST | 管理员 |
/// | /api/menu/{id} | PUT / DELETE | 管理员 |
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/menu", get(handler::list).post(handler::create))
        .route("/api/menu/{id}", put(handler::update).delete(handler::delete))
}
