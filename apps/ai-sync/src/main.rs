//! `ai-sync`: pull assistant-config files out of a git repository.

use std::path::PathBuf;
use std::process::ExitCode;

use ai_sync_core::config::{LoadedConfig, LoggingConfig, load_merged};
use ai_sync_core::{ClassificationPolicy, Transport};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "ai-sync")]
#[command(about = "Copy Copilot instructions, prompts, and agents out of a git repository")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone a repository and copy its assistant-config files into a target directory
    Sync(SyncArgs),

    /// List the assistant-config files of a local directory
    Scan {
        /// Directory to scan
        dir: PathBuf,

        /// Classification policy (defaults to config, then strict)
        #[arg(long)]
        policy: Option<ClassificationPolicy>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: commands::config::ConfigCommands,
    },
}

#[derive(Args)]
pub struct SyncArgs {
    /// Repository URL (https://, http://, or git@)
    pub url: String,

    /// Target directory (defaults to config `default_target_path`, then ~/.copilot)
    #[arg(short, long)]
    pub target: Option<String>,

    /// Base directory for a relative target
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// Classification policy: strict or permissive
    #[arg(long)]
    pub policy: Option<ClassificationPolicy>,

    /// Clone transport: gix or shell
    #[arg(long)]
    pub transport: Option<Transport>,

    /// Show what would be copied without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = std::env::current_dir()
        .context("Failed to determine current directory")
        .and_then(|cwd| load_merged(&cwd));

    let logging_config = loaded
        .as_ref()
        .map(|l| l.config.logging.clone())
        .unwrap_or_else(|_| LoggingConfig::default());
    logging::init(cli.quiet, cli.verbose, &logging_config);

    info!("Starting ai-sync v{}", env!("CARGO_PKG_VERSION"));
    if let Ok(loaded) = &loaded {
        for warning in &loaded.warnings {
            warn!("{warning}");
        }
    }

    match run(cli.command, cli.quiet, loaded).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red());
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, quiet: bool, loaded: Result<LoadedConfig>) -> Result<()> {
    match command {
        Commands::Sync(args) => commands::sync::execute(args, quiet, &loaded?.config).await,
        Commands::Scan { dir, policy, json } => {
            commands::scan::execute(&dir, policy, json, &loaded?.config)
        }
        Commands::Config { command } => commands::config::execute(command, loaded),
    }
}
