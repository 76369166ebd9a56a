//! Route handlers organized by resource

pub mod admins;
pub mod members;
