use config::{Config, ConfigError, Environment as ConfigEnvironment, File};
use serde::de::DeserializeOwned;
use std::env;
use std::path::{Path, PathBuf};

/// 選擇環境的環境變數
pub const ENV_VAR: &str = "PMAN_ENV";
/// 覆寫配置的環境變數前綴
pub const ENV_PREFIX: &str = "PMAN";

/// 環境類型枚舉
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// 從環境變數取得當前環境設定
    pub fn from_env() -> Self {
        match env::var(ENV_VAR)
            .unwrap_or_else(|_| "development".into())
            .to_lowercase()
            .as_str()
        {
            "production" => Environment::Production,
            _ => Environment::Development,
        }
    }

    /// 轉換為配置文件名
    pub fn as_filename(&self) -> &'static str {
        match self {
            Environment::Development => "development.toml",
            Environment::Production => "production.toml",
        }
    }
}

/// 配置加載器，負責根據環境加載適當的配置
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置目錄，`CONFIG_DIR` 未設定時使用 `config`
    pub fn config_dir() -> PathBuf {
        PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "config".into()))
    }

    /// 載入指定環境的配置
    pub fn load(env: Environment) -> Result<Config, ConfigError> {
        Self::load_from_dir(&Self::config_dir(), env)
    }

    /// 從指定目錄載入配置，環境變數覆寫文件中的值
    pub fn load_from_dir(dir: &Path, env: Environment) -> Result<Config, ConfigError> {
        Config::builder()
            .add_source(File::from(dir.join(env.as_filename())))
            .add_source(
                ConfigEnvironment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
    }

    /// 載入當前環境的配置
    pub fn load_current() -> Result<Config, ConfigError> {
        Self::load(Environment::from_env())
    }
}

/// 配置獲取輔助特性
pub trait ConfigExt {
    /// 從配置中獲取並反序列化指定部分
    fn get_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError>;
}

impl ConfigExt for Config {
    fn get_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError> {
        self.get(section)
    }
}
