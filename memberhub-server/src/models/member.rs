//! Member records

use serde::{Deserialize, Serialize};

use super::validation::{require, ValidationError};

/// A stored member.
///
/// `id` is assigned by the store on insert and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub package_type: String,
}

/// Insert request for a member.
///
/// Any `id` sent by the client is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMember {
    pub name: String,
    pub email: String,
    pub package_type: String,
}

impl NewMember {
    /// Check that every field is present and non-blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        require("packageType", &self.package_type)
    }

    /// Attach the store-assigned id.
    pub fn with_id(self, id: i64) -> Member {
        Member {
            id,
            name: self.name,
            email: self.email,
            package_type: self.package_type,
        }
    }
}
