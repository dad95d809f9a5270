use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Please enter a valid Git repository URL (got '{url}')")]
    InvalidRepoUrl { url: String },

    #[error(
        "Please provide an absolute target path or a base directory (got '{}')",
        path.display()
    )]
    UnresolvableTarget { path: PathBuf },

    #[error("Could not determine home directory")]
    HomeDirUnavailable,

    #[error("{message} ({url})")]
    Transport { url: String, message: String },

    #[error("Required tool not found: {tool}")]
    ToolNotFound { tool: String },

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is outside the clone root {}", path.display(), root.display())]
    OutsideCloneRoot { path: PathBuf, root: PathBuf },

    #[error("Operation cancelled")]
    Cancelled,
}

impl SyncError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Errors raised before any work starts; the caller renders them verbatim.
    pub fn is_input_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidRepoUrl { .. } | Self::UnresolvableTarget { .. } | Self::HomeDirUnavailable
        )
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
