//! Admin Login Handler

use std::time::Duration;

use axum::{Json, extract::State};
use shared::models::{LoginRequest, LoginResponse};

use crate::auth::password::verify_password;
use crate::core::ServerState;
use crate::db::repository::admin;
use crate::security_log;
use crate::utils::validation::{MAX_EMAIL_LEN, MAX_PASSWORD_LEN};
use crate::utils::{AppError, AppResult};

/// 登录失败时的固定延迟, 抹平账号存在与否的时间差
const FAILED_LOGIN_DELAY: Duration = Duration::from_millis(300);

/// POST /api/admin/login - 管理员登录
///
/// 账号不存在与密码错误返回同一错误
pub async fn login(State(state): State<ServerState>, Json(req): Json<LoginRequest>) -> AppResult<Json<LoginResponse>> {
    let email = req.email.trim();
    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::validation("Email and password are required"));
    }
    if email.len() > MAX_EMAIL_LEN || req.password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::invalid_credentials());
    }

    let found = admin::find_by_email(state.pool(), email).await?;

    let admin = match found {
        Some(admin) => {
            let ok = verify_password(&req.password, &admin.password_hash).unwrap_or_else(|e| {
                tracing::error!(email = %admin.email, "Stored password hash is invalid: {e}");
                false
            });
            ok.then_some(admin)
        }
        None => None,
    };

    let Some(admin) = admin else {
        tokio::time::sleep(FAILED_LOGIN_DELAY).await;
        security_log!("WARN", "login_failed", email = email.to_string());
        return Err(AppError::invalid_credentials());
    };

    let token = state.get_jwt_service().generate_token(&admin.id, &admin.email)?;
    security_log!("INFO", "login_success", admin_id = admin.id.clone());
    tracing::info!(email = %admin.email, "Admin logged in");

    Ok(Json(LoginResponse { token }))
}
