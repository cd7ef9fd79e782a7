use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::utils::AppResult;

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 5000 | HTTP 服务端口 |
/// | DATABASE_URL | sqlite:velvet_brew.db | SQLite 数据库 |
/// | UPLOADS_DIR | uploads | 菜品图片目录 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | - | 日志文件目录 (存在时按天滚动写入) |
/// | JWT_SECRET | - | JWT 密钥 (至少 32 字符, 非开发环境必填) |
/// | JWT_EXPIRATION_MINUTES | 1440 | 令牌有效期 |
/// | MAX_UPLOAD_BYTES | 5242880 | 单张图片上限 |
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 DATABASE_URL=sqlite:/data/brew.db cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// sqlx 连接串
    pub database_url: String,
    /// 上传图片存放目录, 通过 /uploads 对外提供
    pub uploads_dir: PathBuf,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: Option<String>,
    pub log_dir: Option<String>,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 单个上传文件大小上限 (字节)
    pub max_upload_bytes: usize,
}

/// 默认上传上限 (5MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

impl Config {
    /// 从环境变量加载配置
    ///
    /// 未设置的项使用默认值; 非开发环境缺少 JWT_SECRET 时返回错误
    pub fn from_env() -> AppResult<Self> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let jwt = JwtConfig::from_env(environment == "development")?;

        Ok(Self {
            http_port: env_parse("HTTP_PORT").unwrap_or(5000),
            database_url: std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:velvet_brew.db".into()),
            uploads_dir: std::env::var("UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            environment,
            log_level: std::env::var("LOG_LEVEL").ok(),
            log_dir: std::env::var("LOG_DIR").ok(),
            jwt,
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES").unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        })
    }

    /// 使用自定义值构建配置, 不读取环境变量
    ///
    /// 常用于测试场景
    pub fn with_overrides(
        database_url: impl Into<String>,
        uploads_dir: impl Into<PathBuf>,
        jwt: JwtConfig,
    ) -> Self {
        Self {
            http_port: 0,
            database_url: database_url.into(),
            uploads_dir: uploads_dir.into(),
            environment: "development".into(),
            log_level: None,
            log_dir: None,
            jwt,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
