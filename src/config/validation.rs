use thiserror::Error;

/// 配置驗證錯誤
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("缺少必要配置項: {0}")]
    MissingField(String),

    #[error("無效的配置值: {0}")]
    InvalidValue(String),

    #[error("配置範圍錯誤: {field} 的值 {value} 不在範圍 {min}..{max} 內")]
    RangeError {
        field: String,
        value: String,
        min: String,
        max: String,
    },

    #[error("依賴錯誤: {dependent} 依賴於 {dependency} 的配置")]
    DependencyError {
        dependent: String,
        dependency: String,
    },
}

/// 配置驗證器trait
pub trait Validator {
    /// 驗證配置
    fn validate(&self) -> Result<(), ValidationError>;
}

/// 驗證配置區段
pub fn validate_config<T>(config: &T) -> Result<(), ValidationError>
where
    T: Validator,
{
    config.validate()
}

/// 驗證工具函數
pub struct ValidationUtils;

impl ValidationUtils {
    /// 驗證配置值是否在指定範圍內（含邊界）
    pub fn in_range<T>(value: T, min: T, max: T, field_name: &str) -> Result<(), ValidationError>
    where
        T: PartialOrd + ToString,
    {
        if value < min || value > max {
            return Err(ValidationError::RangeError {
                field: field_name.to_string(),
                value: value.to_string(),
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        Ok(())
    }

    /// 驗證字串是否為允許值之一（不分大小寫）
    pub fn one_of(value: &str, options: &[&str], field_name: &str) -> Result<(), ValidationError> {
        let normalized = value.to_lowercase();
        if !options.iter().any(|option| *option == normalized) {
            return Err(ValidationError::InvalidValue(format!(
                "{} 的值 {} 不是有效選項: {:?}",
                field_name, value, options
            )));
        }
        Ok(())
    }

    /// 檢查必要的字串欄位是否有值
    pub fn not_empty(value: &str, field_name: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingField(field_name.to_string()));
        }
        Ok(())
    }

    /// 檢查字串是否以指定前綴開頭
    pub fn has_prefix(value: &str, prefix: &str, field_name: &str) -> Result<(), ValidationError> {
        if !value.starts_with(prefix) {
            return Err(ValidationError::InvalidValue(format!(
                "{} 必須以 {} 開頭: {}",
                field_name, prefix, value
            )));
        }
        Ok(())
    }

    /// 檢查兩個欄位的依賴關係
    pub fn check_dependency(
        has_dependent: bool,
        has_dependency: bool,
        dependent_name: &str,
        dependency_name: &str,
    ) -> Result<(), ValidationError> {
        if has_dependent && !has_dependency {
            return Err(ValidationError::DependencyError {
                dependent: dependent_name.to_string(),
                dependency: dependency_name.to_string(),
            });
        }
        Ok(())
    }
}
