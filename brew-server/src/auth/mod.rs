//! 认证模块
//!
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentAdmin`] - 当前管理员上下文
//! - [`require_auth`] - 认证中间件
//! - [`password`] - Argon2 密码哈希

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentAdmin, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
