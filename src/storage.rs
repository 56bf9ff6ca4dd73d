pub mod database;
pub mod error;
pub mod migrations;
pub mod models;
pub mod repository;

// 只匯出必要的數據庫功能
pub use database::{with_timeout, Database, DatabasePool, HealthProbe};
pub use error::{StorageError, StorageResult};

// 匯出主要的模型
pub use models::{
    EventDetails, Portfolio, Position, PositionEvent, PositionEventKind, PositionFilter, User,
};

// 匯出主要的倉儲接口和實現
pub use repository::{
    PortfolioRepository, PositionEventRepository, PositionRepository, SqlitePortfolioRepository,
    SqlitePositionEventRepository, SqlitePositionRepository, SqliteUserRepository, UserRepository,
};

// 匯出遷移功能
pub use migrations::{migration_status, run_migrations, MigrationStatus};

#[cfg(test)]
pub(crate) async fn create_test_database() -> Database {
    let db = Database::in_memory(std::time::Duration::from_secs(5))
        .await
        .expect("Failed to create test database");
    run_migrations(db.pool())
        .await
        .expect("Failed to initialize test schema");
    db
}
