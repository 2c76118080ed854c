// File: livebot-core/src/repositories/postgres/chats.rs

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use livebot_common::error::Error;
use livebot_common::models::Chat;
use livebot_common::traits::repository_traits::ChatRepository;

pub struct PostgresChatRepository {
    pub pool: Pool<Postgres>,
}

impl PostgresChatRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for PostgresChatRepository {
    async fn list_chats(&self) -> Result<Vec<Chat>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT chat_id, chat_name
            FROM chats
            ORDER BY chat_name
            "#,
        )
            .fetch_all(&self.pool)
            .await?;

        let mut chats = Vec::with_capacity(rows.len());
        for r in rows {
            chats.push(Chat {
                chat_id: r.try_get("chat_id")?,
                chat_name: r.try_get("chat_name")?,
            });
        }
        Ok(chats)
    }

    async fn get_chat_by_name(&self, chat_name: &str) -> Result<Option<Chat>, Error> {
        let row_opt = sqlx::query(
            r#"
            SELECT chat_id, chat_name
            FROM chats
            WHERE chat_name = $1
            "#,
        )
            .bind(chat_name)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(r) = row_opt {
            Ok(Some(Chat {
                chat_id: r.try_get("chat_id")?,
                chat_name: r.try_get("chat_name")?,
            }))
        } else {
            Ok(None)
        }
    }

    async fn insert_chat(&self, chat: &Chat) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO chats (chat_id, chat_name)
            VALUES ($1, $2)
            ON CONFLICT (chat_id) DO UPDATE SET chat_name = EXCLUDED.chat_name
            "#,
        )
            .bind(chat.chat_id)
            .bind(&chat.chat_name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_chat(&self, chat_id: i64) -> Result<(), Error> {
        sqlx::query("DELETE FROM chats WHERE chat_id = $1")
            .bind(chat_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
