//! Interledger Node: entry point.
//!
//! Hosts the escrow, asset guard and relay status ledger in one process.
//! Subcommands: init, scenario.

mod commands;
mod config;
mod node;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use config::{LoggingConfig, NodeConfig};

/// Interledger Node
#[derive(Parser, Debug)]
#[command(name = "interledger-node", version, about = "Interledger Node")]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, global = true, default_value = "interledger.toml")]
    config: PathBuf,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default configuration file.
    Init(commands::init::InitArgs),
    /// Run a scripted flow against in-process ledgers.
    Scenario(commands::scenario::ScenarioArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.command {
        Commands::Init(_) => NodeConfig::default(),
        Commands::Scenario(_) => NodeConfig::load(&cli.config)?,
    };
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }

    init_tracing(&config.logging);
    tracing::info!("Interledger Node v{}", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Commands::Init(args) => commands::init::run(args, &cli.config),
        Commands::Scenario(args) => commands::scenario::run(args, config).await,
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    // Logs go to stderr so stdout carries only the outbox dump.
    if logging.is_json() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
