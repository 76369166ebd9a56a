//! Admin password hashing and verification
//!
//! New secrets are stored as Argon2 PHC strings. Rows written before
//! hashing was introduced still hold plain text; those are compared in
//! constant time so existing logins keep working.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use once_cell::sync::Lazy;
use subtle::ConstantTimeEq;

use super::DbError;
use crate::models::Admin;

/// Hash verified when a username has no rows, so a miss costs the same as a wrong password.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("memberhub-timing-guard").ok());

/// Stored admin row including the secret. Never serialized.
#[derive(sqlx::FromRow)]
pub(crate) struct StoredAdmin {
    pub id: i64,
    pub username: String,
    pub password: String,
}

/// Hash a password using default Argon2 settings.
pub fn hash_password(password: &str) -> Result<String, DbError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DbError::PasswordHash(e.to_string()))
}

/// Check a candidate password against a stored value.
///
/// PHC strings are verified with Argon2; anything else is treated as a
/// legacy plain-text secret. A plain-text value that happens to parse as a
/// PHC string is verified as a hash and never matches itself.
pub fn verify_password(candidate: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(hash) => Argon2::default()
            .verify_password(candidate.as_bytes(), &hash)
            .is_ok(),
        Err(_) => candidate.as_bytes().ct_eq(stored.as_bytes()).into(),
    }
}

/// Hash off the async runtime.
pub(crate) async fn hash_password_blocking(password: String) -> Result<String, DbError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| DbError::PasswordHash(e.to_string()))?
}

/// Pick the first row whose secret matches `candidate`.
///
/// Runs on the blocking pool; Argon2 verification is CPU-bound.
pub(crate) async fn match_stored(
    rows: Vec<StoredAdmin>,
    candidate: String,
) -> Result<Admin, DbError> {
    tokio::task::spawn_blocking(move || {
        if rows.is_empty() {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                verify_password(&candidate, dummy);
            }
            return Err(DbError::InvalidCredentials);
        }

        rows.into_iter()
            .find(|row| verify_password(&candidate, &row.password))
            .map(|row| Admin {
                id: row.id,
                username: row.username,
            })
            .ok_or(DbError::InvalidCredentials)
    })
    .await
    .map_err(|e| DbError::PasswordHash(e.to_string()))?
}
