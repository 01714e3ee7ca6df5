//! Lifexia CLI: the main entry point.
//!
//! Commands:
//! - `ask`     : Answer one message
//! - `chat`    : Interactive chat on stdin
//! - `history` : Show a user's recent turns
//! - `drugs`   : List knowledge-base records
//! - `drug`    : Show one record
//! - `doctor`  : Diagnose configuration and backends
//! - `onboard` : Write the default config

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "lifexia",
    about = "Lifexia — pharmacy and symptom triage assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ~/.lifexia/config.toml)
    #[arg(short, long, global = true, env = "LIFEXIA_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single message
    Ask {
        /// Whose conversation this message belongs to
        #[arg(short, long)]
        user: String,

        /// The message text
        #[arg(short, long)]
        message: String,

        /// Print the full reply as JSON
        #[arg(long)]
        json: bool,
    },

    /// Chat interactively, one message per line
    Chat {
        #[arg(short, long)]
        user: String,
    },

    /// Show recent turns for a user, oldest first
    History {
        #[arg(short, long)]
        user: String,

        /// Maximum number of turns (default: history.list_limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List knowledge-base records
    Drugs {
        /// Only banned and recalled drugs
        #[arg(long)]
        restricted: bool,
    },

    /// Show one knowledge-base record
    Drug {
        /// Brand or generic name (substring, case-insensitive)
        name: String,
    },

    /// Diagnose configuration, stores and the generation backend
    Doctor,

    /// Write the default configuration file
    Onboard,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Ask { user, message, json } => {
            commands::ask::run(config_path, &user, &message, json).await?
        }
        Commands::Chat { user } => commands::chat::run(config_path, &user).await?,
        Commands::History { user, limit } => commands::history::run(config_path, &user, limit).await?,
        Commands::Drugs { restricted } => commands::drugs::list(config_path, restricted)?,
        Commands::Drug { name } => commands::drugs::show(config_path, &name)?,
        Commands::Doctor => commands::doctor::run(config_path).await?,
        Commands::Onboard => commands::onboard::run(config_path)?,
    }

    Ok(())
}
