use async_trait::async_trait;

use crate::storage::database::Database;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::models::{EventFields, PositionEvent, PositionEventInsert, PositionEventKind};
use crate::storage::repository::{parent_violation, row_exists, ParentTable};

/// 持倉事件儲存庫特徵
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PositionEventRepository: Send + Sync {
    /// 為持倉新增事件，持倉不存在時返回 `ReferentialIntegrity`
    async fn create(&self, position_id: i64, event: PositionEventInsert) -> StorageResult<PositionEvent>;

    /// 依插入順序列出持倉的事件，持倉不存在時返回 `NotFound`
    async fn list_for_position(&self, position_id: i64) -> StorageResult<Vec<PositionEvent>>;
}

/// position_event 資料列，數值欄位依 kind 可為空
#[derive(Debug, Clone, sqlx::FromRow)]
struct PositionEventRow {
    id: i64,
    position_id: i64,
    kind: String,
    date: String,
    notes: String,
    amount: Option<f64>,
    ratio: Option<f64>,
    quantity: Option<i64>,
    price: Option<f64>,
    transaction_type: Option<String>,
    commission: Option<f64>,
    fees: Option<f64>,
}

impl TryFrom<PositionEventRow> for PositionEvent {
    type Error = StorageError;

    fn try_from(row: PositionEventRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let decode = move |err: crate::storage::models::EventShapeError| {
            StorageError::Decode(format!("position_event {id}: {err}"))
        };
        let kind: PositionEventKind = row.kind.parse().map_err(decode)?;
        let details = EventFields {
            amount: row.amount,
            ratio: row.ratio,
            quantity: row.quantity,
            price: row.price,
            transaction_type: row.transaction_type,
            commission: row.commission,
            fees: row.fees,
        }
        .into_details(kind)
        .map_err(decode)?;

        Ok(PositionEvent {
            id,
            position_id: row.position_id,
            kind,
            date: row.date,
            notes: row.notes,
            details,
        })
    }
}

const EVENT_COLUMNS: &str = "id, position_id, kind, date, notes, amount, ratio, quantity, \
                             price, transaction_type, commission, fees";

/// SQLite 持倉事件儲存庫實現
#[derive(Debug, Clone)]
pub struct SqlitePositionEventRepository {
    db: Database,
}

impl SqlitePositionEventRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PositionEventRepository for SqlitePositionEventRepository {
    async fn create(&self, position_id: i64, event: PositionEventInsert) -> StorageResult<PositionEvent> {
        self.db
            .run(async {
                let mut tx = self.db.pool().begin().await?;

                if !row_exists(&mut tx, ParentTable::Position, position_id).await? {
                    return Err(StorageError::ReferentialIntegrity {
                        entity: ParentTable::Position.entity(),
                        id: position_id,
                    });
                }

                let fields = EventFields::from(event.details());
                let sql = format!(
                    "INSERT INTO position_event (position_id, kind, date, notes, amount, ratio, \
                     quantity, price, transaction_type, commission, fees) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {EVENT_COLUMNS}"
                );
                let row = sqlx::query_as::<_, PositionEventRow>(&sql)
                    .bind(position_id)
                    .bind(event.kind().as_str())
                    .bind(event.date())
                    .bind(event.notes())
                    .bind(fields.amount)
                    .bind(fields.ratio)
                    .bind(fields.quantity)
                    .bind(fields.price)
                    .bind(fields.transaction_type)
                    .bind(fields.commission)
                    .bind(fields.fees)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(parent_violation(ParentTable::Position, position_id))?;

                tx.commit().await?;
                PositionEvent::try_from(row)
            })
            .await
    }

    async fn list_for_position(&self, position_id: i64) -> StorageResult<Vec<PositionEvent>> {
        self.db
            .run(async {
                let mut conn = self.db.pool().acquire().await?;

                if !row_exists(&mut conn, ParentTable::Position, position_id).await? {
                    return Err(StorageError::NotFound {
                        entity: ParentTable::Position.entity(),
                        id: position_id,
                    });
                }

                let sql = format!(
                    "SELECT {EVENT_COLUMNS} FROM position_event WHERE position_id = ? ORDER BY id"
                );
                let rows = sqlx::query_as::<_, PositionEventRow>(&sql)
                    .bind(position_id)
                    .fetch_all(&mut *conn)
                    .await?;

                rows.into_iter().map(PositionEvent::try_from).collect()
            })
            .await
    }
}
