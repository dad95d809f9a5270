use std::path::{Path, PathBuf};

use crate::error::{Result, SyncError};

/// Target used when neither the command line nor config names one.
pub const DEFAULT_TARGET_DISPLAY: &str = "~/.copilot";

/// Expand a leading tilde (`~`, `~/x`, or `~x`) to the home directory.
pub fn expand_path(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_string_lossy();
    let Some(rest) = path_str.strip_prefix('~') else {
        return Ok(path.to_path_buf());
    };
    let home = dirs::home_dir().ok_or(SyncError::HomeDirUnavailable)?;
    let rest = rest.trim_start_matches(['/', '\\']);
    if rest.is_empty() {
        Ok(home)
    } else {
        Ok(home.join(rest))
    }
}

/// Resolve a user-supplied target directory.
///
/// The tilde is expanded first; an absolute result is used as-is, otherwise it
/// is joined onto `base_dir`. Without a base directory a relative target is
/// rejected rather than resolved against the process working directory.
pub fn resolve_target_path(input: &Path, base_dir: Option<&Path>) -> Result<PathBuf> {
    let expanded = expand_path(input)?;
    if expanded.is_absolute() {
        return Ok(expanded);
    }
    match base_dir {
        Some(base) => Ok(expand_path(base)?.join(expanded)),
        None => Err(SyncError::UnresolvableTarget {
            path: input.to_path_buf(),
        }),
    }
}

/// `~/.copilot`
pub fn default_target_path() -> Result<PathBuf> {
    expand_path(Path::new(DEFAULT_TARGET_DISPLAY))
}
