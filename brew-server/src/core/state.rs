use std::path::Path;
use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::utils::{AppError, AppResult};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝, 每个请求 clone 一份。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Arc<Config> | 配置项 (不可变) |
/// | pool | SqlitePool | 数据库连接池 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 1. 创建上传目录
    /// 2. 打开数据库并执行迁移
    /// 3. 创建 JWT 服务
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        tokio::fs::create_dir_all(&config.uploads_dir).await.map_err(|e| {
            AppError::internal(format!(
                "Failed to create uploads dir {}: {e}",
                config.uploads_dir.display()
            ))
        })?;

        let db = DbService::new(&config.database_url).await?;
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        tracing::info!(
            database = %config.database_url,
            uploads = %config.uploads_dir.display(),
            environment = %config.environment,
            "Server state initialized"
        );

        Ok(Self {
            config: Arc::new(config.clone()),
            pool: db.pool,
            jwt_service,
        })
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// 上传图片目录
    pub fn uploads_dir(&self) -> &Path {
        &self.config.uploads_dir
    }
}
