//! PostgreSQL access for the gateway: pool setup, migrations, row models
//! and the repositories behind search, identifier lookup and reload.

use sqlx::postgres::PgPoolOptions;
use sqlx::Executor;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Schemas searched for unqualified names on every connection.
pub const SEARCH_PATH: &str = "SET search_path TO dci, public";

/// Create a connection pool from a database URL.
///
/// Every new connection gets the gateway's `search_path` so ad hoc queries
/// resolve `dci` objects without qualification.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute(SEARCH_PATH).await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
