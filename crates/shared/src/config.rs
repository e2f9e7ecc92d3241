//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// 服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// 认证配置
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// JWT 签名密钥
    pub jwt_secret: String,
    /// Token 过期时间（秒）
    pub token_expires_in_secs: i64,
    /// Token 签发者
    pub issuer: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "course-account-secret-change-in-production".to_string(),
            token_expires_in_secs: 86400, // 24 小时
            issuer: "account-service".to_string(),
        }
    }
}

/// 推送配置
#[derive(Debug, Clone, Deserialize)]
pub struct PushConfig {
    /// 关闭时使用模拟发送器，仅记录日志
    pub enabled: bool,
    pub endpoint: String,
    pub server_key: String,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "https://fcm.googleapis.com/fcm/send".to_string(),
            server_key: String::new(),
        }
    }
}

/// 保留期清理配置
#[derive(Debug, Clone, Deserialize)]
pub struct RetentionConfig {
    /// 保留天数，超过该天数的课程和通知会被清理
    pub retention_days: i64,
    /// 清理任务的 cron 表达式（秒 分 时 日 月 周）
    pub cron: String,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            retention_days: 14,
            // 每天凌晨 3 点执行
            cron: "0 0 3 * * *".to_string(),
        }
    }
}

/// 可观测性配置
#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
    /// 日志输出格式：json（结构化）或 pretty（人类可读）
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub push: PushConfig,
    pub retention: RetentionConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. config/default.toml（默认配置）
    /// 2. config/{environment}.toml（环境特定配置）
    /// 3. config/{service_name}.toml（服务特定配置）
    /// 4. 环境变量（COURSE_ 前缀，如 COURSE_SERVER_PORT -> server.port）
    pub fn load(service_name: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("COURSE_ENV").unwrap_or_else(|_| "development".to_string());
        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        let builder = Config::builder()
            .set_default("service_name", service_name)?
            .set_default("environment", env.clone())?
            .add_source(File::from(Path::new(&config_dir).join("default.toml")).required(false))
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{env}.toml"))).required(false),
            )
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{service_name}.toml")))
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("COURSE")
                    .separator("_")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// 获取服务地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
