use async_trait::async_trait;

use crate::storage::database::Database;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::models::{Portfolio, PortfolioInsert};
use crate::storage::repository::{parent_violation, row_exists, ParentTable};

/// 投資組合儲存庫特徵
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PortfolioRepository: Send + Sync {
    /// 創建投資組合，使用者不存在時返回 `ReferentialIntegrity`
    async fn create(&self, portfolio: PortfolioInsert) -> StorageResult<Portfolio>;

    /// 根據ID獲取投資組合
    async fn get_by_id(&self, id: i64) -> StorageResult<Option<Portfolio>>;

    /// 依 ID 順序列出投資組合，可依使用者過濾
    async fn list(&self, user_id: Option<i64>) -> StorageResult<Vec<Portfolio>>;
}

/// SQLite 投資組合儲存庫實現
#[derive(Debug, Clone)]
pub struct SqlitePortfolioRepository {
    db: Database,
}

impl SqlitePortfolioRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PortfolioRepository for SqlitePortfolioRepository {
    async fn create(&self, portfolio: PortfolioInsert) -> StorageResult<Portfolio> {
        self.db
            .run(async {
                let mut tx = self.db.pool().begin().await?;

                if !row_exists(&mut tx, ParentTable::User, portfolio.user_id).await? {
                    return Err(StorageError::ReferentialIntegrity {
                        entity: ParentTable::User.entity(),
                        id: portfolio.user_id,
                    });
                }

                let record = sqlx::query_as::<_, Portfolio>(
                    r#"
                    INSERT INTO portfolio (name, user_id)
                    VALUES (?, ?)
                    RETURNING id, name, user_id
                    "#,
                )
                .bind(&portfolio.name)
                .bind(portfolio.user_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(parent_violation(ParentTable::User, portfolio.user_id))?;

                tx.commit().await?;
                Ok(record)
            })
            .await
    }

    async fn get_by_id(&self, id: i64) -> StorageResult<Option<Portfolio>> {
        self.db
            .run(async {
                let record = sqlx::query_as::<_, Portfolio>(
                    "SELECT id, name, user_id FROM portfolio WHERE id = ?",
                )
                .bind(id)
                .fetch_optional(self.db.pool())
                .await?;

                Ok(record)
            })
            .await
    }

    async fn list(&self, user_id: Option<i64>) -> StorageResult<Vec<Portfolio>> {
        self.db
            .run(async {
                let mut conn = self.db.pool().acquire().await?;

                if let Some(user_id) = user_id {
                    if !row_exists(&mut conn, ParentTable::User, user_id).await? {
                        return Err(StorageError::NotFound {
                            entity: ParentTable::User.entity(),
                            id: user_id,
                        });
                    }
                }

                let records = sqlx::query_as::<_, Portfolio>(
                    r#"
                    SELECT id, name, user_id
                    FROM portfolio
                    WHERE (?1 IS NULL OR user_id = ?1)
                    ORDER BY id
                    "#,
                )
                .bind(user_id)
                .fetch_all(&mut *conn)
                .await?;

                Ok(records)
            })
            .await
    }
}
