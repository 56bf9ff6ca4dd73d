use serde::{Deserialize, Serialize};

/// 使用者模型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// 使用者插入模型
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInsert {
    pub name: String,
    pub email: String,
}
