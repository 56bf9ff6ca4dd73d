use serde::{Deserialize, Serialize};

/// 持倉模型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Position {
    pub id: i64,
    pub portfolio_id: i64,
    pub exchange: String,
    pub symbol: String,
    pub quantity: i64,
    pub price: f64,
    /// ISO-8601 形式的日期字串，不做格式檢查
    pub date: String,
}

/// 持倉插入模型
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionInsert {
    pub portfolio_id: i64,
    pub exchange: String,
    pub symbol: String,
    pub quantity: i64,
    pub price: f64,
    pub date: String,
}

/// 持倉刪除條件，至少需要一個欄位
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionFilter {
    pub id: Option<i64>,
    pub portfolio_id: Option<i64>,
}

impl PositionFilter {
    pub fn by_id(id: i64) -> Self {
        Self {
            id: Some(id),
            portfolio_id: None,
        }
    }

    pub fn by_portfolio(portfolio_id: i64) -> Self {
        Self {
            id: None,
            portfolio_id: Some(portfolio_id),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.portfolio_id.is_none()
    }
}
