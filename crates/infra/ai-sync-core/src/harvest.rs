//! Depth-first harvesting of assistant-config files from a source tree.
//!
//! Traversal uses an explicit work-list rather than recursion. Once a directory
//! qualifies, its whole subtree is collected without further classification.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::cancel::CancellationToken;
use crate::classify::{ClassificationPolicy, is_excluded_dir_name};
use crate::error::{Result, SyncError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Classify each entry.
    Search,
    /// Take every file, no classification.
    Collect,
}

/// Walk `root` and return the absolute paths of every qualifying file.
///
/// Entries of one directory are visited in file-name order. Symlinks are not
/// followed. Cancellation is polled before each directory listing and surfaces
/// as [`SyncError::Cancelled`]; a directory that cannot be listed aborts the
/// whole harvest.
pub fn harvest(
    root: &Path,
    policy: ClassificationPolicy,
    cancel: &CancellationToken,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![(root.to_path_buf(), Mode::Search)];

    while let Some((dir, mode)) = stack.pop() {
        if cancel.is_cancelled() {
            debug!(dir = %dir.display(), "harvest cancelled");
            return Err(SyncError::Cancelled);
        }

        let mut entries = fs::read_dir(&dir)
            .map_err(|e| SyncError::io(&dir, e))?
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|e| SyncError::io(&dir, e))?;
        entries.sort_by_key(fs::DirEntry::file_name);

        let mut subdirs = Vec::new();
        for entry in entries {
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| SyncError::io(&path, e))?;
            let name = entry.file_name();
            let name = name.to_string_lossy();

            if file_type.is_dir() {
                if is_excluded_dir_name(&name) {
                    trace!(path = %path.display(), "skipping excluded directory");
                    continue;
                }
                let child_mode = match mode {
                    Mode::Collect => Mode::Collect,
                    Mode::Search if policy.qualifies_dir(&relative_key(root, &path)) => {
                        debug!(path = %path.display(), "collecting qualifying directory");
                        Mode::Collect
                    }
                    Mode::Search => Mode::Search,
                };
                subdirs.push((path, child_mode));
            } else if file_type.is_file() {
                if mode == Mode::Collect || policy.qualifies_file(&name) {
                    trace!(path = %path.display(), "harvested");
                    files.push(path);
                }
            } else {
                debug!(path = %path.display(), "skipping non-regular entry");
            }
        }

        // Reverse so the first subdirectory is popped next.
        stack.extend(subdirs.into_iter().rev());
    }

    debug!(root = %root.display(), count = files.len(), "harvest complete");
    Ok(files)
}

/// Path of `path` relative to `root`, '/'-joined, as the classifier expects.
fn relative_key(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
