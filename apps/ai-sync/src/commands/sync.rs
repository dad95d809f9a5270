use std::io::IsTerminal;
use std::path::Path;

use ai_sync_core::config::AiSyncConfig;
use ai_sync_core::utils::paths::{DEFAULT_TARGET_DISPLAY, expand_path, resolve_target_path};
use ai_sync_core::utils::validation::validate_repo_url;
use ai_sync_core::{
    CancellationToken, ProgressSink, Stage, SyncOutcome, SyncRequest, run_sync,
};
use anyhow::{Context, Result};
use colored::Colorize;
use tracing::{debug, info, warn};

use super::render_sync_error;
use crate::SyncArgs;

/// Stage lines on stderr; per-file progress goes to the debug log only.
struct ConsoleProgress {
    visible: bool,
}

impl ProgressSink for ConsoleProgress {
    fn report(&self, stage: Stage) {
        match stage {
            Stage::Copied { .. } => debug!("{stage}"),
            _ if self.visible => eprintln!("{} {stage}", "→".cyan()),
            _ => info!("{stage}"),
        }
    }
}

pub async fn execute(args: SyncArgs, quiet: bool, config: &AiSyncConfig) -> Result<()> {
    validate_repo_url(&args.url).map_err(|e| render_sync_error(&e))?;

    // Echoed back verbatim in the success line.
    let target_display = args
        .target
        .or_else(|| {
            config
                .default_target_path
                .clone()
                .filter(|p| !p.trim().is_empty())
        })
        .unwrap_or_else(|| DEFAULT_TARGET_DISPLAY.to_string());
    let base_dir = args.base_dir.or_else(|| config.base_dir.clone());
    let target = resolve_target_path(Path::new(&target_display), base_dir.as_deref())
        .map_err(|e| render_sync_error(&e))?;

    let workspace_parent = config
        .workspace_dir
        .as_deref()
        .map(expand_path)
        .transpose()
        .map_err(|e| render_sync_error(&e))?;

    let request = SyncRequest {
        repo_url: args.url,
        target,
        policy: args.policy.unwrap_or(config.policy),
        workspace_parent,
        dry_run: args.dry_run,
    };
    let transport = args.transport.unwrap_or(config.transport);
    let visible = !quiet && std::io::stderr().is_terminal();
    debug!(%transport, policy = %request.policy, "resolved sync settings");

    let cancel = CancellationToken::new();
    let watcher = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, cancelling");
                cancel.cancel();
            }
        }
    });

    let outcome = tokio::task::spawn_blocking(move || {
        let cloner = transport.cloner(visible);
        let progress = ConsoleProgress { visible };
        run_sync(&request, &*cloner, &progress, &cancel)
    })
    .await
    .context("Sync task failed")?;
    watcher.abort();

    match outcome.map_err(|e| render_sync_error(&e))? {
        SyncOutcome::Copied { count, .. } => {
            if !quiet {
                println!(
                    "{} Successfully copied {count} copilot file(s) to {target_display}",
                    "✓".green()
                );
            }
        }
        SyncOutcome::NothingFound => {
            println!(
                "{} No copilot files found in the repository",
                "⚠".yellow()
            );
        }
        SyncOutcome::DryRun { plan } => {
            println!(
                "Would copy {} copilot file(s) to {}:",
                plan.len(),
                plan.target_root.display().to_string().cyan()
            );
            for entry in &plan.entries {
                println!("  {}", entry.relative.display());
            }
        }
        SyncOutcome::Cancelled { copied } => {
            info!(copied, "sync cancelled");
        }
    }
    Ok(())
}
