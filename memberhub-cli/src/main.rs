//! memberhub CLI - membership backend
//!
//! This is the main entry point for the memberhub command-line tool, which provides:
//! - The HTTP API server over an embedded or networked store (`serve`)
//! - Admin seeding without going through HTTP (`add-admin`)

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "memberhub",
    author,
    version,
    about = "Membership backend: members, admins, and a login gate over SQLite or PostgreSQL",
    long_about = "Serve the membership API. Set DATABASE_URL to use a PostgreSQL server; \
                  leave it unset to use an embedded SQLite file."
)]
struct Cli {
    /// Enable debug logging (unless RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Add an admin account directly to the store
    AddAdmin(commands::add_admin::AddAdminArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before clap reads env-backed arguments
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::AddAdmin(args) => commands::run_add_admin(args).await?,
    }

    Ok(())
}
