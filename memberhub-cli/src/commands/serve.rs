//! HTTP server command for the memberhub API
//!
//! Resolves the store once, then serves until Ctrl+C/SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use memberhub_server::{connect, run_server, ServerConfig};

use super::StoreArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "MEMBERHUB_BIND", default_value = "127.0.0.1:5272")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Directory of front-end files (index.html, scripts)
    #[arg(long, env = "MEMBERHUB_STATIC_DIR", default_value = "wwwroot")]
    pub static_dir: PathBuf,

    /// Do not serve front-end files
    #[arg(long)]
    pub no_static: bool,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let store_config = args.store.resolve()?;
    tracing::info!(
        backend = store_config.backend_name(),
        "Starting memberhub server on {}",
        args.bind
    );

    let repos = connect(&store_config)
        .await
        .context("Failed to open the member store")?;

    if !args.no_static && !args.static_dir.is_dir() {
        tracing::warn!(path = %args.static_dir.display(), "Static directory not found");
    }

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
        static_dir: (!args.no_static).then_some(args.static_dir),
    };

    // Run server (blocks until shutdown)
    run_server(repos, config).await.context("Server error")?;

    Ok(())
}
