//! Membership Index administrative CLI.
//!
//! Thin wrapper over `membership_index::IndexManager` for schema setup and
//! ad-hoc inspection; the library itself has no server loop of its own.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use membership_index::{Config, IndexManager};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "membership-index", about = "Membership index administrative CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the membership and staging tables if they don't exist.
    InitSchema,
    /// Truncate the membership and staging tables.
    Clear,
    /// Print the committed membership table to the log.
    DumpMembership,
    /// Print the staging table to the log.
    DumpStaging,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let config = Config::from_env().context("failed to load configuration")?;
    let manager = IndexManager::connect(&config)
        .await
        .context("failed to connect to the index store")?;

    match cli.command {
        Commands::InitSchema => {
            manager.init_schema().await.context("failed to apply schema")?;
            info!("schema applied");
        }
        Commands::Clear => {
            manager.clear_index().await.context("failed to clear index")?;
            info!("index cleared");
        }
        Commands::DumpMembership => {
            manager
                .log_membership_table()
                .await
                .context("failed to dump membership table")?;
        }
        Commands::DumpStaging => {
            manager
                .log_staging_table()
                .await
                .context("failed to dump staging table")?;
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
