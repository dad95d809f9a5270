use std::num::NonZeroU32;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cancel::CancellationToken;
use crate::error::{Result, SyncError};
use crate::git::progress::TransferProgress;

const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Produces a single-commit working tree of `url` at `destination`.
///
/// On failure the destination is left in an unspecified state; callers must
/// not read it.
pub trait RepoCloner {
    fn clone_shallow(
        &self,
        url: &str,
        destination: &Path,
        cancel: &CancellationToken,
    ) -> Result<()>;
}

/// Which clone transport to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Built-in gitoxide client.
    #[default]
    Gix,
    /// System `git` executable (uses the user's SSH agent and credential helpers).
    Shell,
}

impl Transport {
    pub fn cloner(self, show_progress: bool) -> Box<dyn RepoCloner + Send + Sync> {
        match self {
            Self::Gix => Box::new(GixCloner { show_progress }),
            Self::Shell => Box::new(ShellGitCloner),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gix => "gix",
            Self::Shell => "shell",
        }
    }
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Transport {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gix" | "gitoxide" => Ok(Self::Gix),
            "shell" | "git" => Ok(Self::Shell),
            other => Err(format!(
                "unknown transport '{other}' (expected 'gix' or 'shell')"
            )),
        }
    }
}

/// Shallow clone through gitoxide.
#[derive(Debug, Default, Clone, Copy)]
pub struct GixCloner {
    pub show_progress: bool,
}

impl RepoCloner for GixCloner {
    fn clone_shallow(
        &self,
        url: &str,
        destination: &Path,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let transport_err = |message: String| {
            if cancel.is_cancelled() {
                SyncError::Cancelled
            } else {
                SyncError::Transport {
                    url: url.to_string(),
                    message,
                }
            }
        };

        let parsed = gix::url::parse(url.into())
            .map_err(|e| transport_err(format!("invalid repository URL: {e}")))?;

        info!(url, destination = %destination.display(), "cloning (depth 1)");

        let mut prepare = gix::prepare_clone(parsed, destination)
            .map_err(|e| transport_err(format!("failed to prepare clone: {e}")))?
            .with_shallow(gix::remote::fetch::Shallow::DepthAtRemote(NonZeroU32::MIN));

        let (mut checkout, _fetch_outcome) = prepare
            .fetch_then_checkout(
                TransferProgress::new("receiving", self.show_progress),
                cancel.as_flag(),
            )
            .map_err(|e| transport_err(format!("fetch failed: {e}")))?;

        let (_repo, _outcome) = checkout
            .main_worktree(
                TransferProgress::new("checkout", self.show_progress),
                cancel.as_flag(),
            )
            .map_err(|e| transport_err(format!("checkout failed: {e}")))?;

        debug!(destination = %destination.display(), "clone completed");
        Ok(())
    }
}

/// Build the `git clone` invocation used by [`ShellGitCloner`].
pub fn build_clone_command(url: &str, destination: &Path) -> Command {
    let mut cmd = Command::new("git");
    cmd.args(["clone", "--depth", "1", "--single-branch", "--quiet", "--"])
        .arg(url)
        .arg(destination);
    cmd
}

/// Shallow clone through the system `git` executable.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellGitCloner;

impl RepoCloner for ShellGitCloner {
    fn clone_shallow(
        &self,
        url: &str,
        destination: &Path,
        cancel: &CancellationToken,
    ) -> Result<()> {
        which::which("git").map_err(|_| SyncError::ToolNotFound {
            tool: "git".to_string(),
        })?;

        info!(url, destination = %destination.display(), "cloning with system git (depth 1)");

        let mut child = build_clone_command(url, destination)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| SyncError::Transport {
                url: url.to_string(),
                message: format!("failed to spawn git clone: {e}"),
            })?;

        let status = loop {
            if cancel.is_cancelled() {
                warn!("cancelling git clone");
                if let Err(e) = child.kill() {
                    debug!(error = %e, "git clone already exited");
                }
                // Reap the child; its exit status no longer matters.
                let _ = child.wait();
                return Err(SyncError::Cancelled);
            }
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => thread::sleep(CANCEL_POLL_INTERVAL),
                Err(e) => {
                    return Err(SyncError::Transport {
                        url: url.to_string(),
                        message: format!("failed to wait for git clone: {e}"),
                    });
                }
            }
        };

        if !status.success() {
            return Err(SyncError::Transport {
                url: url.to_string(),
                message: format!("git clone exited with code {:?}", status.code()),
            });
        }
        Ok(())
    }
}
