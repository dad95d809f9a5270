pub mod cancel;
pub mod classify;
pub mod config;
pub mod copy;
pub mod error;
pub mod git;
pub mod harvest;
pub mod progress;
pub mod sync;
pub mod utils;
pub mod workspace;

pub use cancel::CancellationToken;
pub use classify::ClassificationPolicy;
pub use config::{AiSyncConfig, LoadedConfig, load_merged};
pub use copy::{CopyEntry, CopyPlan, CopyReport};
pub use error::{Result, SyncError};
pub use git::{GixCloner, RepoCloner, ShellGitCloner, Transport};
pub use harvest::harvest;
pub use progress::{NoProgress, ProgressSink, Stage, TracingProgress};
pub use sync::{SyncOutcome, SyncRequest, run_sync, scan};
pub use workspace::{EphemeralWorkspace, with_ephemeral_workspace};
