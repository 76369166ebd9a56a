//! Embedded SQLite backend
//!
//! Writes go through a `RetryPolicy` because a single-writer file store
//! reports BUSY/LOCKED under concurrent writers.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{AdminRepository, MemberRepository};
use crate::db::password::{hash_password_blocking, match_stored, StoredAdmin};
use crate::db::pool::{create_sqlite_pool, DEFAULT_BUSY_TIMEOUT};
use crate::db::{DbError, RetryPolicy};
use crate::models::{Admin, AdminCredentials, Member, NewMember};

const SCHEMA: &str = include_str!("../schema/sqlite.sql");

/// SQLite primary result codes for contention.
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Tuning for the embedded store.
#[derive(Debug, Clone, Copy)]
pub struct SqliteOptions {
    /// Retry applied to inserts
    pub retry: RetryPolicy,
    /// SQLite's own wait on a held lock before it reports BUSY
    pub busy_timeout: Duration,
}

impl Default for SqliteOptions {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

/// Member and admin storage in a local SQLite file.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    retry: RetryPolicy,
}

impl SqliteStore {
    /// Open with default options (5 attempts, 500ms apart).
    pub async fn open(path: &Path) -> Result<Self, DbError> {
        Self::open_with(path, SqliteOptions::default()).await
    }

    /// Open the file (WAL once), then create missing tables.
    pub async fn open_with(path: &Path, options: SqliteOptions) -> Result<Self, DbError> {
        let pool = create_sqlite_pool(path, options.busy_timeout).await?;
        sqlx::raw_sql(SCHEMA).execute(&pool).await?;
        Ok(Self {
            pool,
            retry: options.retry,
        })
    }

    /// Get reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn try_insert_member(&self, member: &NewMember) -> Result<Member, DbError> {
        let result =
            sqlx::query("INSERT INTO members (name, email, package_type) VALUES (?, ?, ?)")
                .bind(&member.name)
                .bind(&member.email)
                .bind(&member.package_type)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() != 1 {
            return Err(DbError::NotInserted { table: "members" });
        }
        Ok(member.clone().with_id(result.last_insert_rowid()))
    }

    async fn try_insert_admin(&self, username: &str, hash: &str) -> Result<Admin, DbError> {
        let result = sqlx::query("INSERT INTO admins (username, password) VALUES (?, ?)")
            .bind(username)
            .bind(hash)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() != 1 {
            return Err(DbError::NotInserted { table: "admins" });
        }
        Ok(Admin {
            id: result.last_insert_rowid(),
            username: username.to_owned(),
        })
    }
}

/// True for SQLite BUSY/LOCKED, including extended codes.
pub fn is_busy(err: &DbError) -> bool {
    let DbError::Sqlx(sqlx::Error::Database(db_err)) = err else {
        return false;
    };
    db_err
        .code()
        .and_then(|code| code.parse::<i32>().ok())
        .map(|code| matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
        .unwrap_or(false)
}

#[async_trait]
impl MemberRepository for SqliteStore {
    async fn list_members(&self) -> Result<Vec<Member>, DbError> {
        let members = sqlx::query_as::<_, Member>(
            "SELECT id, name, email, package_type FROM members",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }

    async fn insert_member(&self, member: NewMember) -> Result<Member, DbError> {
        let member = &member;
        let inserted = self
            .retry
            .run(is_busy, |_| self.try_insert_member(member))
            .await?;
        tracing::debug!(id = inserted.id, "Member inserted");
        Ok(inserted)
    }

    async fn delete_member(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM members WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "member",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AdminRepository for SqliteStore {
    async fn list_admins(&self) -> Result<Vec<Admin>, DbError> {
        let admins = sqlx::query_as::<_, Admin>("SELECT id, username FROM admins")
            .fetch_all(&self.pool)
            .await?;
        Ok(admins)
    }

    async fn insert_admin(&self, credentials: AdminCredentials) -> Result<Admin, DbError> {
        let AdminCredentials { username, password } = credentials;
        let hash = hash_password_blocking(password).await?;
        let (username, hash) = (username.as_str(), hash.as_str());

        let admin = self
            .retry
            .run(is_busy, |_| self.try_insert_admin(username, hash))
            .await?;
        Ok(admin)
    }

    async fn authenticate(&self, credentials: &AdminCredentials) -> Result<Admin, DbError> {
        let rows = sqlx::query_as::<_, StoredAdmin>(
            "SELECT id, username, password FROM admins WHERE username = ?",
        )
        .bind(&credentials.username)
        .fetch_all(&self.pool)
        .await?;

        match_stored(rows, credentials.password.clone()).await
    }
}
