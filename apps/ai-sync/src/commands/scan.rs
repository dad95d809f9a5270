use std::path::Path;

use ai_sync_core::config::AiSyncConfig;
use ai_sync_core::utils::paths::expand_path;
use ai_sync_core::{CancellationToken, ClassificationPolicy, scan};
use anyhow::{Context, Result};
use colored::Colorize;

use super::render_sync_error;

pub fn execute(
    dir: &Path,
    policy: Option<ClassificationPolicy>,
    json: bool,
    config: &AiSyncConfig,
) -> Result<()> {
    let root = expand_path(dir).map_err(|e| render_sync_error(&e))?;
    let policy = policy.unwrap_or(config.policy);

    let files = scan(&root, policy, &CancellationToken::new())
        .with_context(|| format!("Failed to scan {}", root.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&files)?);
        return Ok(());
    }

    if files.is_empty() {
        println!(
            "{} No copilot files found in {}",
            "⚠".yellow(),
            root.display()
        );
        return Ok(());
    }
    for file in &files {
        println!("{}", file.display());
    }
    eprintln!(
        "{} {} copilot file(s) found ({policy} policy)",
        "✓".green(),
        files.len()
    );
    Ok(())
}
