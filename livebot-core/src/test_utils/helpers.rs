// File: livebot-core/src/test_utils/helpers.rs
//
// Postgres-backed test setup. Tests using these are `#[ignore]`d and run
// with `TEST_DATABASE_URL` pointing at a disposable database.

use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

use crate::db::Database;
use crate::Error;

/// By default looks for `TEST_DATABASE_URL` in env,
/// else uses `postgres://livebot@localhost/livebot_test`.
pub async fn create_test_db_pool() -> Result<Pool<Postgres>, Error> {
    let url = std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| "postgres://livebot@localhost/livebot_test".to_string());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await?;

    Ok(pool)
}

/// Wipes out test data so each test can start fresh.
pub async fn clean_database(pool: &Pool<Postgres>) -> Result<(), Error> {
    sqlx::query(
        r#"
        TRUNCATE TABLE
            subscribers,
            subscriptions,
            custom_commands,
            chats
        RESTART IDENTITY CASCADE;
    "#,
    )
        .execute(pool)
        .await?;

    Ok(())
}

/// Returns a migrated, empty test DB handle.
pub async fn setup_test_database() -> Result<Database, Error> {
    let pool = create_test_db_pool().await?;
    let db = Database::from_pool(pool);
    db.migrate().await?;
    clean_database(db.pool()).await?;
    Ok(db)
}
