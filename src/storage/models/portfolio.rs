use serde::{Deserialize, Serialize};

/// 投資組合模型，隸屬於單一使用者
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Portfolio {
    pub id: i64,
    pub name: String,
    pub user_id: i64,
}

/// 投資組合插入模型
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioInsert {
    pub name: String,
    pub user_id: i64,
}
