//! Repository interfaces and their two backends
//!
//! Each operation is a single parameterized statement. Row order from the
//! list operations is whatever the store returns; no ORDER BY is applied.

pub mod postgres;
pub mod sqlite;

use async_trait::async_trait;

use super::DbError;
use crate::models::{Admin, AdminCredentials, Member, NewMember};

pub use postgres::PgStore;
pub use sqlite::{SqliteOptions, SqliteStore};

/// Member storage operations.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// All members (id, name, email, package tier).
    async fn list_members(&self) -> Result<Vec<Member>, DbError>;

    /// Insert one member and return it with the store-assigned id.
    ///
    /// Fails with `DbError::Locked` when the store stayed busy for every
    /// attempt, `DbError::NotInserted` when no row was written.
    async fn insert_member(&self, member: NewMember) -> Result<Member, DbError>;

    /// Delete one member; `DbError::NotFound` when no row had that id.
    async fn delete_member(&self, id: i64) -> Result<(), DbError>;
}

/// Admin storage and the login check.
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// All admins, credentials excluded.
    async fn list_admins(&self) -> Result<Vec<Admin>, DbError>;

    /// Insert one admin; the password is stored as an Argon2 hash.
    async fn insert_admin(&self, credentials: AdminCredentials) -> Result<Admin, DbError>;

    /// Find the admin whose username matches exactly and whose stored
    /// secret verifies against the candidate password.
    async fn authenticate(&self, credentials: &AdminCredentials) -> Result<Admin, DbError>;
}
