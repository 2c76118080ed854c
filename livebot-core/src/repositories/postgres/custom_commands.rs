// File: livebot-core/src/repositories/postgres/custom_commands.rs

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use livebot_common::error::Error;
use livebot_common::models::CustomCommand;
use livebot_common::traits::repository_traits::CustomCommandRepository;

pub struct PostgresCustomCommandRepository {
    pub pool: Pool<Postgres>,
}

impl PostgresCustomCommandRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomCommandRepository for PostgresCustomCommandRepository {
    async fn get_command(&self, chat_id: i64, name: &str) -> Result<Option<CustomCommand>, Error> {
        let row_opt = sqlx::query(
            r#"
            SELECT chat_id, name, reply
            FROM custom_commands
            WHERE chat_id = $1 AND name = $2
            "#,
        )
            .bind(chat_id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(r) = row_opt {
            Ok(Some(CustomCommand {
                chat_id: r.try_get("chat_id")?,
                name: r.try_get("name")?,
                reply: r.try_get("reply")?,
            }))
        } else {
            Ok(None)
        }
    }

    async fn create_command(&self, cmd: &CustomCommand) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO custom_commands (chat_id, name, reply)
            VALUES ($1, $2, $3)
            "#,
        )
            .bind(cmd.chat_id)
            .bind(&cmd.name)
            .bind(&cmd.reply)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_command(&self, chat_id: i64, name: &str, reply: &str) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE custom_commands
            SET reply = $3
            WHERE chat_id = $1 AND name = $2
            "#,
        )
            .bind(chat_id)
            .bind(name)
            .bind(reply)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_command(&self, chat_id: i64, name: &str) -> Result<(), Error> {
        sqlx::query("DELETE FROM custom_commands WHERE chat_id = $1 AND name = $2")
            .bind(chat_id)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
