//! Admin records
//!
//! The stored secret never leaves the store layer: `Admin` has no
//! password field, so nothing built from it can echo one back.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::validation::{require, ValidationError};

/// Read projection of an admin (credentials excluded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Admin {
    pub id: i64,
    pub username: String,
}

/// Username/password pair used by add-admin and login.
#[derive(Clone, Deserialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Check that both fields are present and non-blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("username", &self.username)?;
        require("password", &self.password)
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
