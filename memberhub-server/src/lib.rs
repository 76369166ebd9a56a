//! memberhub-server: membership backend over an embedded or networked store
//!
//! Exposes member and admin endpoints over HTTP. The backing store is
//! picked once at startup from an optional `DATABASE_URL`:
//! - absent: embedded SQLite file (WAL mode, lock-tolerant inserts)
//! - present: PostgreSQL server parsed from the URL

pub mod config;
pub mod db;
pub mod http;
pub mod models;

pub use config::{ConfigError, PgConnectInfo, StoreConfig};
pub use db::{connect, DbError, Repositories};
pub use http::{build_router, run_server, ServerConfig};
