//! Domain models shared by the store and HTTP layers
//!
//! Wire format is camelCase JSON. Request types are checked for presence
//! with `validate()`; nothing else about their content is enforced.

pub mod admin;
pub mod member;
pub mod validation;

pub use admin::{Admin, AdminCredentials};
pub use member::{Member, NewMember};
pub use validation::ValidationError;
