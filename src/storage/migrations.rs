use sqlx::{migrate::Migrator, SqlitePool};
use tracing::info;

use crate::storage::error::StorageResult;

// 靜態嵌入遷移目錄（此目錄應放在專案根目錄）
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// 單一遷移的狀態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub version: i64,
    pub description: String,
    pub applied: bool,
}

/// 初始化資料庫結構
///
/// 已套用的遷移會被略過，重複呼叫不會報錯也不會建立重複的表。
pub async fn run_migrations(pool: &SqlitePool) -> StorageResult<()> {
    info!("開始執行數據庫遷移...");
    MIGRATOR.run(pool).await?;
    info!("數據庫遷移完成");
    Ok(())
}

/// 列出所有內嵌遷移以及是否已套用
pub async fn migration_status(pool: &SqlitePool) -> StorageResult<Vec<MigrationStatus>> {
    let has_table: i64 = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations')",
    )
    .fetch_one(pool)
    .await?;

    let applied: Vec<i64> = if has_table != 0 {
        sqlx::query_scalar("SELECT version FROM _sqlx_migrations WHERE success = 1 ORDER BY version")
            .fetch_all(pool)
            .await?
    } else {
        Vec::new()
    };

    Ok(MIGRATOR
        .iter()
        .map(|migration| MigrationStatus {
            version: migration.version,
            description: migration.description.to_string(),
            applied: applied.contains(&migration.version),
        })
        .collect())
}
