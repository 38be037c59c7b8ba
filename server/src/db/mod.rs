//! Database Layer
//!
//! `PostgreSQL` pool and embedded migrations.

use std::time::Duration;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Create `PostgreSQL` connection pool with health configuration.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    let pool = pool_options(max_connections).connect(database_url).await?;

    info!("Connected to PostgreSQL");
    Ok(pool)
}

/// Create a pool that connects on first use.
///
/// Routes that never touch the database can be served without a reachable server.
pub fn create_lazy_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    Ok(pool_options(max_connections)
        .min_connections(0)
        .connect_lazy(database_url)?)
}

fn pool_options(max_connections: u32) -> PgPoolOptions {
    PgPoolOptions::new()
        // Keep a few connections warm to avoid cold-start latency
        .min_connections(max_connections.min(2))
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(600))
        .test_before_acquire(true)
}

/// Run database migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations completed");
    Ok(())
}
