//! Seed an admin account from the command line
//!
//! Goes through the same repository as `POST /add-admin`, so the password
//! is stored hashed.

use anyhow::{Context, Result};
use clap::Parser;

use memberhub_server::connect;
use memberhub_server::models::AdminCredentials;

use super::StoreArgs;

/// Arguments for the add-admin command
#[derive(Parser, Debug)]
pub struct AddAdminArgs {
    /// Admin username
    #[arg(long, short = 'u')]
    pub username: String,

    /// Admin password
    #[arg(long, short = 'p', env = "MEMBERHUB_ADMIN_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Insert one admin and report its id
pub async fn run_add_admin(args: AddAdminArgs) -> Result<()> {
    let credentials = AdminCredentials::new(args.username, args.password);
    credentials.validate()?;

    let repos = connect(&args.store.resolve()?)
        .await
        .context("Failed to open the member store")?;

    let admin = repos
        .admins
        .insert_admin(credentials)
        .await
        .context("Failed to add admin")?;

    tracing::info!(id = admin.id, username = %admin.username, "Admin added");
    Ok(())
}
