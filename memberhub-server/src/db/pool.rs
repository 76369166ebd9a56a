//! Database connection pool management
//!
//! One pool per process, sized for a small service. The embedded store
//! switches to write-ahead logging exactly once, on a throwaway
//! connection, before the pool is opened.

use std::path::Path;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{ConnectOptions, Connection, PgPool, SqlitePool};

use crate::config::PgConnectInfo;

/// Default maximum connections for the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Connection acquire timeout.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// How long SQLite itself waits on a held lock before reporting BUSY.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a PostgreSQL connection pool from parsed URL fields.
pub async fn create_pg_pool(info: &PgConnectInfo) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(DEFAULT_MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(info.connect_options()?)
        .await
}

/// Connect options for the embedded store file.
pub fn sqlite_options(path: &Path, busy_timeout: Duration) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .busy_timeout(busy_timeout)
}

/// Put the embedded store into WAL mode.
///
/// Opens one connection, issues the pragma, closes it. Returns the journal
/// mode SQLite reports afterwards (`"wal"` on success).
pub async fn enable_wal(options: &SqliteConnectOptions) -> Result<String, sqlx::Error> {
    let mut conn = options.connect().await?;
    let mode: String = sqlx::query_scalar("PRAGMA journal_mode=WAL")
        .fetch_one(&mut conn)
        .await?;
    conn.close().await?;
    Ok(mode)
}

/// Open the embedded store: WAL once, then the pool.
pub async fn create_sqlite_pool(
    path: &Path,
    busy_timeout: Duration,
) -> Result<SqlitePool, sqlx::Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let options = sqlite_options(path, busy_timeout);
    let mode = enable_wal(&options).await?;
    tracing::info!(path = %path.display(), journal_mode = %mode, "SQLite journal mode set");

    SqlitePoolOptions::new()
        .max_connections(DEFAULT_MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(options)
        .await
}
