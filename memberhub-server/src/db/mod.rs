//! Database layer - backend selection, pools and repositories
//!
//! # Design Principles
//!
//! - One pool per process, picked once at startup from `StoreConfig`
//! - Handlers see `MemberRepository` / `AdminRepository` only
//! - Single auto-committed statement per operation, no transactions
//! - Lock retries only where the embedded backend can report BUSY

pub mod password;
pub mod pool;
pub mod repos;
pub mod retry;

use std::sync::Arc;

use thiserror::Error;

use crate::config::StoreConfig;

pub use pool::{create_pg_pool, create_sqlite_pool};
pub use repos::{AdminRepository, MemberRepository, PgStore, SqliteStore};
pub use retry::{RetryError, RetryPolicy};

/// Database error type
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("database is locked after {attempts} attempts")]
    Locked { attempts: u32 },

    #[error("no row was inserted into {table}")]
    NotInserted { table: &'static str },

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

impl From<RetryError<DbError>> for DbError {
    fn from(err: RetryError<DbError>) -> Self {
        match err {
            RetryError::Exhausted { attempts, last } => {
                tracing::error!(attempts, error = %last, "Giving up on locked store");
                Self::Locked { attempts }
            }
            RetryError::Aborted(err) => err,
        }
    }
}

/// Repository handles shared by every request.
#[derive(Clone)]
pub struct Repositories {
    pub members: Arc<dyn MemberRepository>,
    pub admins: Arc<dyn AdminRepository>,
}

impl Repositories {
    /// Wrap one store that serves both tables.
    pub fn from_store<S>(store: S) -> Self
    where
        S: MemberRepository + AdminRepository + 'static,
    {
        let store = Arc::new(store);
        Self {
            members: store.clone(),
            admins: store,
        }
    }
}

/// Open the configured backend and make sure its tables exist.
pub async fn connect(config: &StoreConfig) -> Result<Repositories, DbError> {
    match config {
        StoreConfig::Embedded { path } => {
            tracing::info!(backend = "sqlite", path = %path.display(), "Opening embedded store");
            let store = SqliteStore::open(path).await?;
            Ok(Repositories::from_store(store))
        }
        StoreConfig::Networked(info) => {
            tracing::info!(backend = "postgres", target = %info, "Connecting to networked store");
            let store = PgStore::connect(info).await?;
            Ok(Repositories::from_store(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_retry_becomes_locked() {
        let err = DbError::from(RetryError::Exhausted {
            attempts: 5,
            last: DbError::Sqlx(sqlx::Error::PoolTimedOut),
        });
        assert!(matches!(err, DbError::Locked { attempts: 5 }));
    }

    #[test]
    fn aborted_retry_keeps_original_error() {
        let err = DbError::from(RetryError::Aborted(DbError::NotInserted { table: "members" }));
        assert!(matches!(err, DbError::NotInserted { table: "members" }));
    }

    #[tokio::test]
    async fn connect_embedded_serves_both_repositories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = StoreConfig::Embedded {
            path: dir.path().join("data.db"),
        };

        let repos = connect(&config).await.expect("connect failed");
        assert!(repos.members.list_members().await.unwrap().is_empty());
        assert!(repos.admins.list_admins().await.unwrap().is_empty());
    }
}
