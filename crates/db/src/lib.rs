//! Postgres access layer: pool setup, migrations, serializable-transaction
//! helpers, row models, and per-table repositories.

pub mod models;
pub mod repositories;

use sqlx::postgres::PgPoolOptions;
use sqlx::{Postgres, Transaction};

pub type DbPool = sqlx::PgPool;

/// Upper bound on attempts for a serializable transaction that keeps hitting
/// write conflicts. After this many failures the conflict error surfaces.
pub const MAX_TX_ATTEMPTS: u32 = 3;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from the crate's `migrations/` directory.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Begin a SERIALIZABLE transaction. Every multi-record business mutation
/// runs under this isolation level so cross-record invariants hold without
/// explicit row locks.
pub async fn begin_serializable(
    pool: &DbPool,
) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
        .execute(&mut *tx)
        .await?;
    Ok(tx)
}

/// Whether an error is a serialization failure or deadlock that a fresh
/// transaction attempt may resolve (SQLSTATE 40001 / 40P01).
pub fn is_retryable(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => matches!(
            db_err.code().as_deref(),
            Some("40001") | Some("40P01")
        ),
        _ => false,
    }
}
