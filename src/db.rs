use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Open the shared connection pool.
///
/// Sized for a small player base with long-lived game sessions: a modest pool
/// with a generous idle timeout so a table that goes quiet between turns does
/// not keep reconnecting. Statement logging is left to the `sea_orm` tracing
/// target configured in `main`.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn connect(database_url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(database_url);
    opts.max_connections(10)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(false);

    let db = Database::connect(opts).await?;
    Ok(db)
}
