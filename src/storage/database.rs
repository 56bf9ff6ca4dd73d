use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::storage::error::{StorageError, StorageResult};

/// 資料庫池類型
pub type DatabasePool = SqlitePool;

/// 資料庫句柄
///
/// 在啟動時建立、傳入 API 狀態，並於關閉時釋放。每次操作都受 `query_timeout` 限制。
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    query_timeout: Duration,
}

impl Database {
    /// 依配置建立連接池並測試連接
    pub async fn connect(config: &DatabaseConfig) -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(config.create_if_missing)
            .foreign_keys(true)
            .disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .max_lifetime(config.max_lifetime())
            .acquire_timeout(config.acquire_timeout())
            .idle_timeout(config.idle_timeout())
            .connect_with(options)
            .await?;

        // 測試連接
        sqlx::query("SELECT 1").execute(&pool).await?;
        info!(url = %config.url, "database pool ready");

        Ok(Self::from_pool(pool, config.query_timeout()))
    }

    /// 單一連線的記憶體資料庫，連線關閉即消失
    pub async fn in_memory(query_timeout: Duration) -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?
            .foreign_keys(true)
            .disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self::from_pool(pool, query_timeout))
    }

    pub fn from_pool(pool: SqlitePool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// 獲取連接池
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    /// 在超時限制內執行一次資料庫操作
    pub async fn run<T, F>(&self, operation: F) -> StorageResult<T>
    where
        F: Future<Output = StorageResult<T>>,
    {
        with_timeout(self.query_timeout, operation).await
    }

    /// 關閉連接池，等待使用中的連線歸還
    pub async fn close(&self) {
        self.pool.close().await;
        info!("database pool closed");
    }
}

/// 超時後放棄 `operation`；未提交的交易隨之回滾
pub async fn with_timeout<T, F>(limit: Duration, operation: F) -> StorageResult<T>
where
    F: Future<Output = StorageResult<T>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => Err(StorageError::Timeout(limit)),
    }
}

/// 資料庫健康檢查
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> StorageResult<()>;
}

#[async_trait]
impl HealthProbe for Database {
    async fn ping(&self) -> StorageResult<()> {
        self.run(async {
            sqlx::query("SELECT 1").execute(&self.pool).await?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn test_in_memory_ping() {
        let db = Database::in_memory(Duration::from_secs(1)).await.unwrap();
        assert!(db.ping().await.is_ok());
        db.close().await;
        assert!(db.ping().await.is_err());
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let limit = Duration::from_millis(10);
        let result: StorageResult<()> = with_timeout(limit, async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert_matches!(result, Err(StorageError::Timeout(d)) if d == limit);
    }

    #[tokio::test]
    async fn test_with_timeout_passes_result_through() {
        let result = with_timeout(Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_connect_creates_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            url: format!("sqlite://{}", dir.path().join("pman.db").display()),
            create_if_missing: true,
            max_connections: 2,
            min_connections: 1,
            max_lifetime_secs: 60,
            acquire_timeout_secs: 3,
            idle_timeout_secs: 60,
            query_timeout_secs: 5,
        };

        let db = Database::connect(&config).await.unwrap();
        assert!(dir.path().join("pman.db").exists());
        assert_eq!(db.query_timeout(), Duration::from_secs(5));
        db.close().await;
    }
}
