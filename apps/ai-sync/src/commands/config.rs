//! `ai-sync config` subcommands.

use ai_sync_core::config::loader::{global_config_path, local_config_path};
use ai_sync_core::config::writer::write_pretty_json_atomic;
use ai_sync_core::config::{AiSyncConfig, LoadedConfig, schema_json_pretty};
use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a default ai-sync.json
    Init {
        /// Create the global config instead of a local one
        #[arg(long)]
        global: bool,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show the merged configuration
    Show {
        /// Output as compact JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the global and local config file locations
    Path,

    /// Output the JSON Schema for ai-sync.json
    Schema,
}

pub fn execute(cmd: ConfigCommands, loaded: Result<LoadedConfig>) -> Result<()> {
    match cmd {
        ConfigCommands::Init { global, force } => cmd_init(global, force),
        ConfigCommands::Show { json } => cmd_show(json, &loaded?),
        ConfigCommands::Path => cmd_path(),
        ConfigCommands::Schema => {
            println!("{}", schema_json_pretty()?);
            Ok(())
        }
    }
}

fn cmd_init(global: bool, force: bool) -> Result<()> {
    let path = if global {
        global_config_path()?
    } else {
        local_config_path(&std::env::current_dir()?)
    };

    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {}\nUse --force to overwrite",
            path.display()
        );
    }

    let value = serde_json::to_value(AiSyncConfig::default())?;
    write_pretty_json_atomic(&path, &value)?;

    println!(
        "{} Created {}",
        "✓".green(),
        path.display().to_string().cyan()
    );
    Ok(())
}

fn cmd_show(json: bool, loaded: &LoadedConfig) -> Result<()> {
    for warning in &loaded.warnings {
        eprintln!("{} {}", "WARN".yellow(), warning);
    }

    if json {
        println!("{}", serde_json::to_string(&loaded.config)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&loaded.config)?);
    }
    Ok(())
}

fn cmd_path() -> Result<()> {
    let global = global_config_path()?;
    let local = local_config_path(&std::env::current_dir()?);
    println!("Global: {}{}", global.display(), presence(&global));
    println!("Local:  {}{}", local.display(), presence(&local));
    Ok(())
}

fn presence(path: &Path) -> String {
    if path.exists() {
        String::new()
    } else {
        format!(" {}", "(not found)".dimmed())
    }
}
