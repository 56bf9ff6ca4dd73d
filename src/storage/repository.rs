use sqlx::SqliteConnection;

use crate::storage::error::{StorageError, StorageResult};

// 重新導出子模塊
pub mod portfolio;
pub mod position;
pub mod position_event;
pub mod user;

// 重新導出常用類型
pub use portfolio::{PortfolioRepository, SqlitePortfolioRepository};
pub use position::{PositionRepository, SqlitePositionRepository};
pub use position_event::{PositionEventRepository, SqlitePositionEventRepository};
pub use user::{SqliteUserRepository, UserRepository};

/// 有外鍵指向的資料表
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentTable {
    User,
    Portfolio,
    Position,
}

impl ParentTable {
    /// 錯誤訊息中使用的實體名稱
    pub fn entity(&self) -> &'static str {
        match self {
            ParentTable::User => "user",
            ParentTable::Portfolio => "portfolio",
            ParentTable::Position => "position",
        }
    }

    fn exists_sql(&self) -> &'static str {
        match self {
            ParentTable::User => "SELECT EXISTS(SELECT 1 FROM user_account WHERE id = ?)",
            ParentTable::Portfolio => "SELECT EXISTS(SELECT 1 FROM portfolio WHERE id = ?)",
            ParentTable::Position => "SELECT EXISTS(SELECT 1 FROM position WHERE id = ?)",
        }
    }
}

/// 檢查父實體是否存在，可在交易中呼叫
pub(crate) async fn row_exists(
    conn: &mut SqliteConnection,
    table: ParentTable,
    id: i64,
) -> StorageResult<bool> {
    let found: i64 = sqlx::query_scalar(table.exists_sql())
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(found != 0)
}

/// 將插入時的外鍵衝突轉為 `ReferentialIntegrity`，其他錯誤原樣返回
///
/// 父實體可能在存在檢查之後被其他連線刪除，此時由資料庫的外鍵約束攔下。
pub(crate) fn parent_violation(table: ParentTable, id: i64) -> impl FnOnce(sqlx::Error) -> StorageError {
    move |err| {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_foreign_key_violation() {
                return StorageError::ReferentialIntegrity {
                    entity: table.entity(),
                    id,
                };
            }
        }
        StorageError::Database(err)
    }
}
