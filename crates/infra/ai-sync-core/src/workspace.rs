//! Ephemeral clone workspace with guaranteed cleanup.
//!
//! The workspace is released exactly once: explicitly at the end of
//! [`with_ephemeral_workspace`], or by `Drop` if the closure unwinds.
//! Release failures are logged and never replace the caller's result.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::classify::EPHEMERAL_DIR_PREFIX;
use crate::error::{Result, SyncError};

#[derive(Debug)]
pub struct EphemeralWorkspace {
    dir: TempDir,
}

impl EphemeralWorkspace {
    /// Create a fresh `.ai-sync-*` directory under `parent`, or the system temp dir.
    pub fn create(parent: Option<&Path>) -> Result<Self> {
        let prefix = format!("{EPHEMERAL_DIR_PREFIX}-");
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);
        let dir = match parent {
            Some(parent) => {
                std::fs::create_dir_all(parent).map_err(|e| SyncError::io(parent, e))?;
                builder.tempdir_in(parent)
            }
            None => builder.tempdir(),
        }
        .map_err(|e| SyncError::io(parent.map_or_else(std::env::temp_dir, Path::to_path_buf), e))?;

        debug!(path = %dir.path().display(), "created ephemeral workspace");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Directory the repository is cloned into.
    pub fn clone_root(&self) -> PathBuf {
        self.dir.path().join("repo")
    }

    /// Remove the workspace, logging (not returning) any failure.
    pub fn release(self) {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => debug!(path = %path.display(), "removed ephemeral workspace"),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to remove ephemeral workspace"),
        }
    }
}

/// Run `f` with a fresh workspace and release it afterward on every exit path.
pub fn with_ephemeral_workspace<T>(
    parent: Option<&Path>,
    f: impl FnOnce(&EphemeralWorkspace) -> Result<T>,
) -> Result<T> {
    let workspace = EphemeralWorkspace::create(parent)?;
    let result = f(&workspace);
    workspace.release();
    result
}
