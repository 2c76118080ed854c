// File: livebot-core/src/repositories/postgres/subscriptions.rs

use std::collections::HashMap;
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};

use livebot_common::error::Error;
use livebot_common::models::{Chat, Subscription};
use livebot_common::traits::repository_traits::SubscriptionRepository;

pub struct PostgresSubscriptionRepository {
    pub pool: Pool<Postgres>,
}

impl PostgresSubscriptionRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn subscription_from_row(r: &PgRow) -> Result<Subscription, Error> {
    Ok(Subscription {
        subscription_id: r.try_get("subscription_id")?,
        chat_id: r.try_get("chat_id")?,
        streamer_id: r.try_get("streamer_id")?,
        streamer_login: r.try_get("streamer_login")?,
    })
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn subscribed_chats(&self, streamer_id: i64) -> Result<Vec<Chat>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT c.chat_id, c.chat_name
            FROM subscriptions s
            JOIN chats c ON c.chat_id = s.chat_id
            WHERE s.streamer_id = $1
            ORDER BY c.chat_name
            "#,
        )
            .bind(streamer_id)
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

    async fn subscribers_by_streamer(&self, streamer_id: i64) -> Result<HashMap<String, Vec<String>>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT c.chat_name, sub.username
            FROM subscribers sub
            JOIN subscriptions s ON s.subscription_id = sub.subscription_id
            JOIN chats c ON c.chat_id = sub.chat_id
            WHERE s.streamer_id = $1
            ORDER BY c.chat_name, sub.username
            "#,
        )
            .bind(streamer_id)
            .fetch_all(&self.pool)
            .await?;

        let mut out: HashMap<String, Vec<String>> = HashMap::new();
        for r in rows {
            let chat_name: String = r.try_get("chat_name")?;
            let username: String = r.try_get("username")?;
            out.entry(chat_name).or_default().push(username);
        }
        Ok(out)
    }

    async fn get_subscription(&self, chat_id: i64, streamer_id: i64) -> Result<Option<Subscription>, Error> {
        let row_opt = sqlx::query(
            r#"
            SELECT subscription_id, chat_id, streamer_id, streamer_login
            FROM subscriptions
            WHERE chat_id = $1 AND streamer_id = $2
            "#,
        )
            .bind(chat_id)
            .bind(streamer_id)
            .fetch_optional(&self.pool)
            .await?;

        row_opt.as_ref().map(subscription_from_row).transpose()
    }

    async fn get_subscription_by_login(&self, chat_id: i64, streamer_login: &str) -> Result<Option<Subscription>, Error> {
        let row_opt = sqlx::query(
            r#"
            SELECT subscription_id, chat_id, streamer_id, streamer_login
            FROM subscriptions
            WHERE chat_id = $1 AND streamer_login = $2
            "#,
        )
            .bind(chat_id)
            .bind(streamer_login)
            .fetch_optional(&self.pool)
            .await?;

        row_opt.as_ref().map(subscription_from_row).transpose()
    }

    async fn create_subscription(&self, chat_id: i64, streamer_id: i64, streamer_login: &str) -> Result<Subscription, Error> {
        let row = sqlx::query(
            r#"
            INSERT INTO subscriptions (chat_id, streamer_id, streamer_login)
            VALUES ($1, $2, $3)
            RETURNING subscription_id, chat_id, streamer_id, streamer_login
            "#,
        )
            .bind(chat_id)
            .bind(streamer_id)
            .bind(streamer_login)
            .fetch_one(&self.pool)
            .await?;

        subscription_from_row(&row)
    }

    async fn delete_subscription(&self, chat_id: i64, streamer_id: i64) -> Result<(), Error> {
        sqlx::query("DELETE FROM subscriptions WHERE chat_id = $1 AND streamer_id = $2")
            .bind(chat_id)
            .bind(streamer_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn is_streamer_subscribed(&self, streamer_id: i64) -> Result<bool, Error> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM subscriptions WHERE streamer_id = $1) AS subscribed")
            .bind(streamer_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("subscribed")?)
    }

    async fn subscribed_streamer_ids(&self) -> Result<Vec<i64>, Error> {
        let rows = sqlx::query("SELECT DISTINCT streamer_id FROM subscriptions ORDER BY streamer_id")
            .fetch_all(&self.pool)
            .await?;

        let mut ids = Vec::with_capacity(rows.len());
        for r in rows {
            let id: i64 = r.try_get("streamer_id")?;
            ids.push(id);
        }
        Ok(ids)
    }

    async fn is_user_subscribed(&self, subscription_id: i64, username: &str) -> Result<bool, Error> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM subscribers
                WHERE subscription_id = $1 AND username = $2
            ) AS subscribed
            "#,
        )
            .bind(subscription_id)
            .bind(username)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("subscribed")?)
    }

    async fn add_subscriber(&self, subscription: &Subscription, username: &str) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO subscribers (chat_id, subscription_id, username)
            VALUES ($1, $2, $3)
            ON CONFLICT (subscription_id, username) DO NOTHING
            "#,
        )
            .bind(subscription.chat_id)
            .bind(subscription.subscription_id)
            .bind(username)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_subscriber(&self, subscription_id: i64, username: &str) -> Result<(), Error> {
        sqlx::query("DELETE FROM subscribers WHERE subscription_id = $1 AND username = $2")
            .bind(subscription_id)
            .bind(username)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
