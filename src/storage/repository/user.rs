use async_trait::async_trait;

use crate::storage::database::Database;
use crate::storage::error::StorageResult;
use crate::storage::models::{User, UserInsert};

/// 使用者儲存庫特徵
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 創建使用者，返回含有新 ID 的紀錄
    async fn create(&self, user: UserInsert) -> StorageResult<User>;

    /// 根據ID獲取使用者
    async fn get_by_id(&self, id: i64) -> StorageResult<Option<User>>;
}

/// SQLite 使用者儲存庫實現
#[derive(Debug, Clone)]
pub struct SqliteUserRepository {
    db: Database,
}

impl SqliteUserRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: UserInsert) -> StorageResult<User> {
        self.db
            .run(async {
                let record = sqlx::query_as::<_, User>(
                    r#"
                    INSERT INTO user_account (name, email)
                    VALUES (?, ?)
                    RETURNING id, name, email
                    "#,
                )
                .bind(&user.name)
                .bind(&user.email)
                .fetch_one(self.db.pool())
                .await?;

                Ok(record)
            })
            .await
    }

    async fn get_by_id(&self, id: i64) -> StorageResult<Option<User>> {
        self.db
            .run(async {
                let record = sqlx::query_as::<_, User>(
                    "SELECT id, name, email FROM user_account WHERE id = ?",
                )
                .bind(id)
                .fetch_optional(self.db.pool())
                .await?;

                Ok(record)
            })
            .await
    }
}
