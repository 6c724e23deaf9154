//! Copperleaf CLI - Database migrations and catalog management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! copperleaf-cli migrate
//!
//! # Load the demo product catalog (no-op if products already exist)
//! copperleaf-cli seed
//!
//! # Wipe and reload the catalog
//! copperleaf-cli seed --force
//! ```
//!
//! # Environment Variables
//!
//! - `COPPERLEAF_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection
//!   string

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "copperleaf-cli")]
#[command(author, version, about = "Copperleaf CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the product catalog with demo data
    Seed {
        /// Wipe the catalog and reseed even if products exist
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { force } => commands::seed::run(force).await?,
    }
    Ok(())
}
