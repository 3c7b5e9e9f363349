//! Dexwatch - DexScreener token watcher with risk screening and alert dispatch
//!
//! # WARNING
//! - Trade signals are forwarded to a Telegram trading bot chat. Review the
//!   configured chat and amounts before enabling live dispatch.
//! - Listings on new pairs are noisy. Expect false positives.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::error;

// Use the library crate
use dexwatch::cli::commands;
use dexwatch::config::Config;

/// Dexwatch - DexScreener token watcher
#[derive(Parser)]
#[command(name = "dexwatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the scheduled watch loop
    Run {
        /// Keep alerts and trade commands local (console + paper sink)
        #[arg(long)]
        dry_run: bool,

        /// Skip the live-dispatch confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Run a single scan cycle and exit
    Scan {
        /// Keep alerts and trade commands local (console + paper sink)
        #[arg(long)]
        dry_run: bool,

        /// Skip the live-dispatch confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Show current configuration (secrets masked)
    Config,

    /// Show recently recorded listings
    History {
        /// Number of records to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dexwatch=info".parse().unwrap()),
        )
        .with_target(true)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::Run { dry_run, yes } => commands::run(&config, dry_run, yes).await,
        Commands::Scan { dry_run, yes } => commands::scan(&config, dry_run, yes).await,
        Commands::Config => commands::show_config(&config),
        Commands::History { limit } => commands::history(&config, limit).await,
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
