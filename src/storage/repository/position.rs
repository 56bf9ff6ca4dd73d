use async_trait::async_trait;
use tracing::debug;

use crate::storage::database::Database;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::models::{Position, PositionFilter, PositionInsert};
use crate::storage::repository::{parent_violation, row_exists, ParentTable};

/// 持倉儲存庫特徵
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PositionRepository: Send + Sync {
    /// 創建持倉，投資組合不存在時返回 `ReferentialIntegrity`
    async fn create(&self, position: PositionInsert) -> StorageResult<Position>;

    /// 根據ID獲取持倉
    async fn get_by_id(&self, id: i64) -> StorageResult<Option<Position>>;

    /// 依插入順序列出持倉，可依投資組合過濾
    async fn list(&self, portfolio_id: Option<i64>) -> StorageResult<Vec<Position>>;

    /// 刪除符合條件的持倉及其事件，返回刪除的持倉數
    ///
    /// 空條件不刪除任何資料。
    async fn delete(&self, filter: PositionFilter) -> StorageResult<u64>;
}

/// SQLite 持倉儲存庫實現
#[derive(Debug, Clone)]
pub struct SqlitePositionRepository {
    db: Database,
}

impl SqlitePositionRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PositionRepository for SqlitePositionRepository {
    async fn create(&self, position: PositionInsert) -> StorageResult<Position> {
        self.db
            .run(async {
                let mut tx = self.db.pool().begin().await?;

                if !row_exists(&mut tx, ParentTable::Portfolio, position.portfolio_id).await? {
                    return Err(StorageError::ReferentialIntegrity {
                        entity: ParentTable::Portfolio.entity(),
                        id: position.portfolio_id,
                    });
                }

                let record = sqlx::query_as::<_, Position>(
                    r#"
                    INSERT INTO position (portfolio_id, exchange, symbol, quantity, price, date)
                    VALUES (?, ?, ?, ?, ?, ?)
                    RETURNING id, portfolio_id, exchange, symbol, quantity, price, date
                    "#,
                )
                .bind(position.portfolio_id)
                .bind(&position.exchange)
                .bind(&position.symbol)
                .bind(position.quantity)
                .bind(position.price)
                .bind(&position.date)
                .fetch_one(&mut *tx)
                .await
                .map_err(parent_violation(ParentTable::Portfolio, position.portfolio_id))?;

                tx.commit().await?;
                Ok(record)
            })
            .await
    }

    async fn get_by_id(&self, id: i64) -> StorageResult<Option<Position>> {
        self.db
            .run(async {
                let record = sqlx::query_as::<_, Position>(
                    r#"
                    SELECT id, portfolio_id, exchange, symbol, quantity, price, date
                    FROM position
                    WHERE id = ?
                    "#,
                )
                .bind(id)
                .fetch_optional(self.db.pool())
                .await?;

                Ok(record)
            })
            .await
    }

    async fn list(&self, portfolio_id: Option<i64>) -> StorageResult<Vec<Position>> {
        self.db
            .run(async {
                let mut conn = self.db.pool().acquire().await?;

                if let Some(portfolio_id) = portfolio_id {
                    if !row_exists(&mut conn, ParentTable::Portfolio, portfolio_id).await? {
                        return Err(StorageError::NotFound {
                            entity: ParentTable::Portfolio.entity(),
                            id: portfolio_id,
                        });
                    }
                }

                let records = sqlx::query_as::<_, Position>(
                    r#"
                    SELECT id, portfolio_id, exchange, symbol, quantity, price, date
                    FROM position
                    WHERE (?1 IS NULL OR portfolio_id = ?1)
                    ORDER BY id
                    "#,
                )
                .bind(portfolio_id)
                .fetch_all(&mut *conn)
                .await?;

                Ok(records)
            })
            .await
    }

    async fn delete(&self, filter: PositionFilter) -> StorageResult<u64> {
        if filter.is_empty() {
            return Ok(0);
        }

        self.db
            .run(async {
                let mut tx = self.db.pool().begin().await?;

                // 先刪除事件，不依賴連線是否開啟外鍵級聯
                let events = sqlx::query(
                    r#"
                    DELETE FROM position_event
                    WHERE position_id IN (
                        SELECT id FROM position
                        WHERE (?1 IS NULL OR id = ?1)
                          AND (?2 IS NULL OR portfolio_id = ?2)
                    )
                    "#,
                )
                .bind(filter.id)
                .bind(filter.portfolio_id)
                .execute(&mut *tx)
                .await?;

                let positions = sqlx::query(
                    r#"
                    DELETE FROM position
                    WHERE (?1 IS NULL OR id = ?1)
                      AND (?2 IS NULL OR portfolio_id = ?2)
                    "#,
                )
                .bind(filter.id)
                .bind(filter.portfolio_id)
                .execute(&mut *tx)
                .await?;

                tx.commit().await?;
                debug!(
                    positions = positions.rows_affected(),
                    events = events.rows_affected(),
                    "deleted positions"
                );
                Ok(positions.rows_affected())
            })
            .await
    }
}
