//! PostgreSQL persistence for readings.
//!
//! - [`repositories::ReadingRepo`] issues the SQL.
//! - [`store::PgReadingStore`] adapts it to the pipeline's
//!   [`ReadingStore`](weatherwatch_core::collection::ReadingStore) seam.

use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

pub mod models;
pub mod repositories;
pub mod store;

pub use store::PgReadingStore;

pub type DbPool = sqlx::PgPool;

/// How long a caller waits for a free pooled connection.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply any pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
