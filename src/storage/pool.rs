//! Connection pool construction.

use crate::infra::config::PoolSettings;
use sqlx::postgres::{PgConnection, PgPoolOptions};
use sqlx::{Executor, PgPool};

/// Puts a session into the state every request expects: read-only by default
/// and, when configured, bounded by `statement_timeout`.
async fn apply_session_guards(conn: &mut PgConnection, statement_timeout_ms: u64) -> Result<(), sqlx::Error> {
    conn.execute("SET default_transaction_read_only = on").await?;
    if statement_timeout_ms > 0 {
        conn.execute(format!("SET statement_timeout = {}", statement_timeout_ms).as_str())
            .await?;
    }
    Ok(())
}

/// Pool options shared by eager and lazy construction.
///
/// Guards are applied on connect and re-applied on every release, after
/// `RESET ALL`, so a statement that changed a setting through `set_config`
/// cannot leak it into the next request. A connection that fails the reset is
/// closed instead of being reused.
pub fn pool_options(settings: &PoolSettings) -> PgPoolOptions {
    let statement_timeout_ms = settings.statement_timeout_ms;

    PgPoolOptions::new()
        .min_connections(settings.min_connections)
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .after_connect(move |conn, _meta| Box::pin(apply_session_guards(conn, statement_timeout_ms)))
        .after_release(move |conn, _meta| {
            Box::pin(async move {
                conn.execute("RESET ALL").await?;
                apply_session_guards(conn, statement_timeout_ms).await?;
                Ok(true)
            })
        })
}

/// Connects the pool and checks it with one round trip.
pub async fn connect_pool(database_url: &str, settings: &PoolSettings) -> anyhow::Result<PgPool> {
    let pool = pool_options(settings)
        .connect(database_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;

    sqlx::query("SELECT 1").execute(&pool).await?;

    tracing::info!(
        min = settings.min_connections,
        max = settings.max_connections,
        "database pool created"
    );
    Ok(pool)
}

/// Builds the pool without connecting; connections open on first acquire.
pub fn connect_pool_lazy(database_url: &str, settings: &PoolSettings) -> anyhow::Result<PgPool> {
    pool_options(settings)
        .connect_lazy(database_url)
        .map_err(|e| anyhow::anyhow!("Invalid database URL: {}", e))
}
