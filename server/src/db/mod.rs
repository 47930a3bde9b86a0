//! Database initialization and migration runner.
//!
//! Startup creates the shared SQLx pool here and brings the schema up to date
//! before the listener accepts any procedure calls.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Connect the `PostgreSQL` pool and run migrations.
///
/// # Errors
///
/// Returns an error if the connection or migrations fail.
pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("src/db/migrations").run(&pool).await?;

    Ok(pool)
}
