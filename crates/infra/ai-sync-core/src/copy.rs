//! Copy plan: harvested clone paths mapped onto the target directory.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use atomicwrites::{AllowOverwrite, AtomicFile};
use serde::Serialize;
use tracing::{debug, info};

use crate::cancel::CancellationToken;
use crate::error::{Result, SyncError};
use crate::progress::{ProgressSink, Stage};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyEntry {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Path relative to both the clone root and the target root.
    pub relative: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyPlan {
    pub target_root: PathBuf,
    pub entries: Vec<CopyEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyReport {
    pub copied: usize,
    pub cancelled: bool,
}

impl CopyPlan {
    /// Map each harvested file onto `target_root`, preserving its path below `clone_root`.
    pub fn build(files: &[PathBuf], clone_root: &Path, target_root: &Path) -> Result<Self> {
        let entries = files
            .iter()
            .map(|source| {
                let relative = source
                    .strip_prefix(clone_root)
                    .map_err(|_| SyncError::OutsideCloneRoot {
                        path: source.clone(),
                        root: clone_root.to_path_buf(),
                    })?
                    .to_path_buf();
                Ok(CopyEntry {
                    source: source.clone(),
                    destination: target_root.join(&relative),
                    relative,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            target_root: target_root.to_path_buf(),
            entries,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy every entry in order, stopping early if `cancel` is set.
    ///
    /// Files already copied stay in place on cancellation. The first IO
    /// failure aborts the remaining entries.
    pub fn execute(
        &self,
        cancel: &CancellationToken,
        progress: &dyn ProgressSink,
    ) -> Result<CopyReport> {
        let total = self.entries.len();
        let mut copied = 0;

        for entry in &self.entries {
            if cancel.is_cancelled() {
                info!(copied, total, "copy cancelled");
                return Ok(CopyReport {
                    copied,
                    cancelled: true,
                });
            }

            copy_file(&entry.source, &entry.destination)?;
            copied += 1;
            debug!(file = %entry.relative.display(), "copied");
            progress.report(Stage::Copied {
                done: copied,
                total,
            });
        }

        Ok(CopyReport {
            copied,
            cancelled: false,
        })
    }
}

/// Copy `source` over `destination` through a temp file and rename, so a
/// failed copy never leaves a truncated destination behind.
fn copy_file(source: &Path, destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| SyncError::io(parent, e))?;
    }

    let mut reader = File::open(source).map_err(|e| SyncError::io(source, e))?;
    let permissions = reader
        .metadata()
        .map_err(|e| SyncError::io(source, e))?
        .permissions();

    AtomicFile::new(destination, AllowOverwrite)
        .write(|f| io::copy(&mut reader, f))
        .map_err(|e| {
            let source = match e {
                atomicwrites::Error::Internal(e) | atomicwrites::Error::User(e) => e,
            };
            SyncError::io(destination, source)
        })?;

    fs::set_permissions(destination, permissions).map_err(|e| SyncError::io(destination, e))
}
