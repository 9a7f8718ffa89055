//! Tendril CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "tendril")]
#[command(
    about = "Incremental usage and change analysis for TypeScript/JavaScript repositories",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Repository root path (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Configuration file (defaults to <root>/tendril.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the repository and update the cache
    Analyze {
        /// Treat every entity as changed
        #[arg(short, long)]
        force: bool,

        /// Print the full entity reports as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show where entities with the given name are used
    Usages {
        /// Exported name to look up
        name: String,
    },
    /// Clear the cache
    Clear,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for command output
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "tendril={log_level},tendril_core={log_level},tendril_indexer={log_level}"
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Tendril v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Repository root: {}", cli.root.display());

    match cli.command {
        Commands::Analyze { force, json } => {
            commands::analyze(cli.root, cli.config, force, json).await
        }
        Commands::Usages { name } => commands::usages(cli.root, cli.config, name).await,
        Commands::Clear => commands::clear(cli.root, cli.config),
        Commands::Version => {
            println!("Tendril v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
