use std::sync::Arc;

use crate::storage::{
    Database, HealthProbe, PortfolioRepository, PositionEventRepository, PositionRepository,
    SqlitePortfolioRepository, SqlitePositionEventRepository, SqlitePositionRepository,
    SqliteUserRepository, UserRepository,
};

/// 所有處理器共用的狀態，只持有儲存庫句柄
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub portfolios: Arc<dyn PortfolioRepository>,
    pub positions: Arc<dyn PositionRepository>,
    pub events: Arc<dyn PositionEventRepository>,
    pub health: Arc<dyn HealthProbe>,
}

impl AppState {
    /// 以同一個資料庫句柄建立所有 SQLite 儲存庫
    pub fn from_database(db: &Database) -> Self {
        Self {
            users: Arc::new(SqliteUserRepository::new(db.clone())),
            portfolios: Arc::new(SqlitePortfolioRepository::new(db.clone())),
            positions: Arc::new(SqlitePositionRepository::new(db.clone())),
            events: Arc::new(SqlitePositionEventRepository::new(db.clone())),
            health: Arc::new(db.clone()),
        }
    }
}
