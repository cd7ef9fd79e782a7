//! Velvet Brew Server - 咖啡店 REST 后端
//!
//! # 架构概述
//!
//! - **菜单** (`api/menu`): 菜品增删改查, 图片随 multipart 表单上传
//! - **订单** (`api/orders`): 下单、管理员列表、订单追踪
//! - **认证** (`auth`): JWT + Argon2 管理员登录
//! - **数据库** (`db`): SQLite (sqlx) 存储与迁移
//!
//! # 模块结构
//!
//! ```text
//! brew-server/src/
//! ├── core/          # 配置、状态、服务器组装
//! ├── auth/          # JWT 认证、密码哈希、中间件
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 日志、输入校验
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentAdmin, JwtService};
pub use core::{Config, Server, ServerState, build_app};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
 _    __     __           __     ____
| |  / /__  / /   _____  / /_   / __ )________ _      __
| | / / _ \/ / | / / _ \/ __/  / __  / ___/ _ \ | /| / /
| |/ /  __/ /| |/ /  __/ /_   / /_/ / /  /  __/ |/ |/ /
|___/\___/_/ |___/\___/\__/  /_____/_/   \___/|__/|__/
    "#
    );
}
