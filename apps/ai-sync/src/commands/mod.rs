pub mod config;
pub mod scan;
pub mod sync;

use ai_sync_core::SyncError;

/// Input problems are shown as-is; everything else is a failed sync.
pub fn render_sync_error(e: &SyncError) -> anyhow::Error {
    if e.is_input_validation() {
        anyhow::anyhow!("{e}")
    } else {
        anyhow::anyhow!("Failed to clone copilot files: {e}")
    }
}
