use config::ConfigError;
use std::path::Path;
use tracing::debug;

use crate::config::loader::{ConfigLoader, Environment};
use crate::config::types::ApplicationConfig;
use crate::config::validation::Validator;

/// 初始化配置（在應用程序啟動時調用）
///
/// 配置以值返回，由呼叫端傳遞給需要的組件。
pub fn init_config() -> Result<ApplicationConfig, ConfigError> {
    let app_config = ApplicationConfig::load_from_env()?;
    debug!("配置初始化成功，環境：{:?}", Environment::from_env());
    Ok(app_config)
}

/// ApplicationConfig 加載方法實現
impl ApplicationConfig {
    /// 從環境變數指定的環境加載配置
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let env = Environment::from_env();
        debug!("從環境加載配置: {:?}", env);
        Self::load(env)
    }

    /// 從指定環境加載配置
    pub fn load(env: Environment) -> Result<Self, ConfigError> {
        Self::load_from_dir(&ConfigLoader::config_dir(), env)
    }

    /// 從指定目錄加載並驗證配置
    pub fn load_from_dir(dir: &Path, env: Environment) -> Result<Self, ConfigError> {
        let config_source = ConfigLoader::load_from_dir(dir, env)?;
        let app_config: ApplicationConfig = config_source.try_deserialize()?;

        app_config
            .validate()
            .map_err(|err| ConfigError::Message(err.to_string()))?;
        debug!("配置驗證通過");

        Ok(app_config)
    }
}
