//! # sieben
//!
//! Command-line front end for a Sieben goal graph.
//!
//! Each invocation loads the graph from SQLite, applies one operation and
//! saves it again:
//! - `sieben add/rename/insert/delete` — shape the graph
//! - `sieben select/hold` — move the two-slot selection cursor
//! - `sieben close/link/swap` — act on the selection
//! - `sieben show/dot/verify` — inspect without changing anything

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::{SiebenConfig, DEFAULT_CONFIG_FILE};

/// Sieben — keep track of goals and what they depend on.
#[derive(Parser)]
#[command(name = "sieben", version, about)]
struct Cli {
    /// Config file (defaults to ./sieben.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Database file, overriding the configured one.
    #[arg(long)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Goal(commands::goal::GoalCommands),
    #[command(flatten)]
    Show(commands::show::ShowCommands),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SiebenConfig::load(path)?,
        None => SiebenConfig::load_or_default(std::path::Path::new(DEFAULT_CONFIG_FILE))?,
    };
    if let Some(db) = cli.db {
        config.database = db;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(config.log_filter.parse()?))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::debug!(database = %config.database.display(), "using database");

    match &cli.command {
        Commands::Goal(command) => commands::goal::execute(command, &config),
        Commands::Show(command) => commands::show::execute(command, &config),
    }
}
