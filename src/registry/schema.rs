//! Pool setup and table bootstrap

use crate::config::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

const CREATE_VALIDATORS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS validators (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    pubkey TEXT NOT NULL UNIQUE,
    blockchain TEXT NOT NULL,
    blockchain_network TEXT NOT NULL,
    status TEXT NOT NULL,
    client TEXT,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

/// Whether `url` names an in-memory database
///
/// Every connection to such a database sees its own empty copy.
pub fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Open a connection pool for the configured database, creating the file if needed
///
/// In-memory databases are pinned to a single connection that is never recycled,
/// so the schema and rows stay visible to every query.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

    let pool_options = if is_in_memory(&config.url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(config.max_connections)
    };

    pool_options.connect_with(options).await
}

/// Create the `validators` table if it does not exist yet
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_VALIDATORS_TABLE).execute(pool).await?;
    Ok(())
}

/// Round-trip a trivial statement to check the database is reachable
pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
