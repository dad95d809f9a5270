//! The clone, harvest, copy pipeline.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::cancel::CancellationToken;
use crate::classify::ClassificationPolicy;
use crate::copy::CopyPlan;
use crate::error::{Result, SyncError};
use crate::git::RepoCloner;
use crate::harvest::harvest;
use crate::progress::{ProgressSink, Stage};
use crate::utils::validation::validate_repo_url;
use crate::workspace::with_ephemeral_workspace;

#[derive(Debug, Clone)]
pub struct SyncRequest {
    pub repo_url: String,
    /// Resolved, absolute target directory.
    pub target: PathBuf,
    pub policy: ClassificationPolicy,
    /// Parent for the ephemeral clone; `None` uses the system temp dir.
    pub workspace_parent: Option<PathBuf>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Copied { count: usize, target: PathBuf },
    /// The plan that would have run. Its source paths pointed into the
    /// workspace, which is gone by the time this is returned.
    DryRun { plan: CopyPlan },
    NothingFound,
    Cancelled { copied: usize },
}

/// Clone `request.repo_url` shallowly, harvest it, and copy the results into
/// `request.target`.
///
/// The ephemeral clone is removed on every path out of this function,
/// including errors and cancellation. Cancellation is reported as
/// [`SyncOutcome::Cancelled`], never as an error.
#[instrument(skip_all, fields(url = %request.repo_url, target = %request.target.display()))]
pub fn run_sync(
    request: &SyncRequest,
    cloner: &dyn RepoCloner,
    progress: &dyn ProgressSink,
    cancel: &CancellationToken,
) -> Result<SyncOutcome> {
    validate_repo_url(&request.repo_url)?;
    let url = request.repo_url.trim();

    let outcome = with_ephemeral_workspace(request.workspace_parent.as_deref(), |ws| {
        if cancel.is_cancelled() {
            return Ok(SyncOutcome::Cancelled { copied: 0 });
        }

        progress.report(Stage::Cloning);
        progress.report(Stage::Downloading);
        let clone_root = ws.clone_root();
        cloner.clone_shallow(url, &clone_root, cancel)?;
        if cancel.is_cancelled() {
            return Ok(SyncOutcome::Cancelled { copied: 0 });
        }

        progress.report(Stage::Harvesting);
        let files = harvest(&clone_root, request.policy, cancel)?;
        info!(found = files.len(), "harvest complete");
        if files.is_empty() {
            return Ok(SyncOutcome::NothingFound);
        }

        let plan = CopyPlan::build(&files, &clone_root, &request.target)?;
        if request.dry_run {
            return Ok(SyncOutcome::DryRun { plan });
        }

        progress.report(Stage::Copying { total: plan.len() });
        std::fs::create_dir_all(&request.target)
            .map_err(|e| SyncError::io(&request.target, e))?;
        let report = plan.execute(cancel, progress)?;

        Ok(if report.cancelled {
            SyncOutcome::Cancelled {
                copied: report.copied,
            }
        } else {
            SyncOutcome::Copied {
                count: report.copied,
                target: request.target.clone(),
            }
        })
    });

    match outcome {
        Err(SyncError::Cancelled) => Ok(SyncOutcome::Cancelled { copied: 0 }),
        other => other,
    }
}

/// Harvest a local tree and return the qualifying files relative to `root`.
pub fn scan(
    root: &Path,
    policy: ClassificationPolicy,
    cancel: &CancellationToken,
) -> Result<Vec<PathBuf>> {
    let files = harvest(root, policy, cancel)?;
    files
        .into_iter()
        .map(|file| {
            file.strip_prefix(root)
                .map(Path::to_path_buf)
                .map_err(|_| SyncError::OutsideCloneRoot {
                    path: file.clone(),
                    root: root.to_path_buf(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;
    use std::cell::Cell;
    use tempfile::TempDir;

    struct PanicCloner;

    impl RepoCloner for PanicCloner {
        fn clone_shallow(&self, _: &str, _: &Path, _: &CancellationToken) -> Result<()> {
            panic!("clone must not run");
        }
    }

    struct CountingCloner(Cell<usize>);

    impl RepoCloner for CountingCloner {
        fn clone_shallow(&self, _: &str, dest: &Path, _: &CancellationToken) -> Result<()> {
            self.0.set(self.0.get() + 1);
            std::fs::create_dir_all(dest.join(".github")).unwrap();
            std::fs::write(dest.join(".github/copilot-instructions.md"), "be nice").unwrap();
            Ok(())
        }
    }

    fn request(target: &Path, parent: &Path) -> SyncRequest {
        SyncRequest {
            repo_url: "https://example.com/org/configs.git".into(),
            target: target.to_path_buf(),
            policy: ClassificationPolicy::Strict,
            workspace_parent: Some(parent.to_path_buf()),
            dry_run: false,
        }
    }

    #[test]
    fn invalid_url_is_rejected_before_cloning() {
        let temp = TempDir::new().unwrap();
        let mut req = request(&temp.path().join("out"), temp.path());
        req.repo_url = "ftp://example.com/repo".into();

        let err = run_sync(&req, &PanicCloner, &NoProgress, &CancellationToken::new()).unwrap_err();
        assert!(matches!(err, SyncError::InvalidRepoUrl { .. }));
    }

    #[test]
    fn cancelled_before_start_skips_clone() {
        let temp = TempDir::new().unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = run_sync(
            &request(&temp.path().join("out"), temp.path()),
            &PanicCloner,
            &NoProgress,
            &cancel,
        )
        .unwrap();
        assert_eq!(outcome, SyncOutcome::Cancelled { copied: 0 });
    }

    #[test]
    fn dry_run_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("out");
        let mut req = request(&target, temp.path());
        req.dry_run = true;
        let cloner = CountingCloner(Cell::new(0));

        let outcome = run_sync(&req, &cloner, &NoProgress, &CancellationToken::new()).unwrap();
        let SyncOutcome::DryRun { plan } = outcome else {
            panic!("expected dry run, got {outcome:?}");
        };
        assert_eq!(cloner.0.get(), 1);
        assert_eq!(plan.len(), 1);
        assert_eq!(
            plan.entries[0].destination,
            target.join(".github/copilot-instructions.md")
        );
        assert!(!target.exists());
    }

    #[test]
    fn scan_returns_relative_paths() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join(".github/prompts")).unwrap();
        std::fs::write(temp.path().join(".github/prompts/review.prompt.md"), "x").unwrap();
        std::fs::write(temp.path().join("README.md"), "x").unwrap();

        let found = scan(
            temp.path(),
            ClassificationPolicy::Strict,
            &CancellationToken::new(),
        )
        .unwrap();
        assert_eq!(found, vec![PathBuf::from(".github/prompts/review.prompt.md")]);
    }
}
