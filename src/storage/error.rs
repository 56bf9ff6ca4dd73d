use std::time::Duration;
use thiserror::Error;

/// 儲存層錯誤類型
#[derive(Error, Debug)]
pub enum StorageError {
    /// 外鍵指向的父實體不存在
    #[error("{entity} {id} does not exist")]
    ReferentialIntegrity { entity: &'static str, id: i64 },

    /// 查詢的實體不存在
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("datastore call exceeded {0:?}")]
    Timeout(Duration),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// 資料列內容無法轉換為模型
    #[error("invalid row: {0}")]
    Decode(String),
}

impl StorageError {
    /// 資料庫不可用、超時等基礎設施問題
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            StorageError::Timeout(_)
                | StorageError::Database(_)
                | StorageError::Migration(_)
                | StorageError::Decode(_)
        )
    }
}

/// 儲存層結果類型別名
pub type StorageResult<T> = Result<T, StorageError>;
