use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::validation::{ValidationError, ValidationUtils, Validator};

/// 應用程序配置結構
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    pub database: DatabaseConfig,
    pub log: LogConfig,
    pub server: ServerConfig,
}

impl Validator for ApplicationConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.log.validate()?;
        self.server.validate()?;

        Ok(())
    }
}

/// 數據庫配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite 連線字串，例如 `sqlite://pman.db`
    pub url: String,
    /// 檔案不存在時是否自動建立
    pub create_if_missing: bool,
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime_secs: u64,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    /// 單次資料庫操作的上限
    pub query_timeout_secs: u64,
}

impl Validator for DatabaseConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::not_empty(&self.url, "database.url")?;
        ValidationUtils::has_prefix(&self.url, "sqlite:", "database.url")?;
        ValidationUtils::in_range(self.min_connections, 0, 100, "database.min_connections")?;
        ValidationUtils::in_range(
            self.max_connections,
            self.min_connections.max(1),
            100,
            "database.max_connections",
        )?;
        ValidationUtils::in_range(self.acquire_timeout_secs, 1, 60, "database.acquire_timeout_secs")?;
        ValidationUtils::in_range(self.query_timeout_secs, 1, 60, "database.query_timeout_secs")?;

        Ok(())
    }
}

impl DatabaseConfig {
    /// 獲取最大生命週期持續時間
    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }

    /// 獲取獲取連接超時持續時間
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// 獲取閒置超時持續時間
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

/// 日誌配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
}

impl LogConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Validator for LogConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::one_of(
            &self.level,
            &["trace", "debug", "info", "warn", "error"],
            "log.level",
        )?;
        ValidationUtils::one_of(&self.format, &["pretty", "json"], "log.format")?;

        Ok(())
    }
}

/// 伺服器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 整個 HTTP 請求的超時（秒）
    pub request_timeout: u64,
    pub enable_compression: bool,
    pub max_body_size: usize,
    pub cors_allow_all: bool,
    pub cors_origins: Vec<String>,
}

impl Validator for ServerConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::not_empty(&self.host, "server.host")?;
        ValidationUtils::in_range(self.port, 1, 65535, "server.port")?;
        ValidationUtils::in_range(self.request_timeout, 1, 300, "server.request_timeout")?;
        ValidationUtils::in_range(self.max_body_size, 1024, 16 * 1024 * 1024, "server.max_body_size")?;

        // 不允許所有來源時，必須指定允許的來源
        ValidationUtils::check_dependency(
            !self.cors_allow_all,
            !self.cors_origins.is_empty(),
            "server.cors_allow_all = false",
            "server.cors_origins",
        )?;

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_config() -> ApplicationConfig {
        ApplicationConfig {
            database: DatabaseConfig {
                url: "sqlite://pman.db".to_string(),
                create_if_missing: true,
                max_connections: 5,
                min_connections: 1,
                max_lifetime_secs: 1800,
                acquire_timeout_secs: 3,
                idle_timeout_secs: 600,
                query_timeout_secs: 5,
            },
            log: LogConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
                request_timeout: 30,
                enable_compression: false,
                max_body_size: 1024 * 1024,
                cors_allow_all: true,
                cors_origins: Vec::new(),
            },
        }
    }

    #[test]
    fn test_sample_config_is_valid() {
        assert!(sample_config().validate().is_ok());
    }

    #[test]
    fn test_database_url_must_be_sqlite() {
        let mut config = sample_config();
        config.database.url = "postgres://localhost/pman".to_string();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_max_connections_not_below_min() {
        let mut config = sample_config();
        config.database.min_connections = 4;
        config.database.max_connections = 2;
        assert!(matches!(
            config.database.validate(),
            Err(ValidationError::RangeError { .. })
        ));
    }

    #[test]
    fn test_cors_origins_required_without_allow_all() {
        let mut config = sample_config();
        config.server.cors_allow_all = false;
        assert!(matches!(
            config.server.validate(),
            Err(ValidationError::DependencyError { .. })
        ));

        config.server.cors_origins = vec!["http://localhost:3000".to_string()];
        assert!(config.server.validate().is_ok());
    }

    #[test]
    fn test_log_format() {
        let mut config = sample_config();
        assert!(!config.log.is_json());
        config.log.format = "JSON".to_string();
        assert!(config.log.is_json());
        config.log.format = "xml".to_string();
        assert!(config.log.validate().is_err());
    }
}
