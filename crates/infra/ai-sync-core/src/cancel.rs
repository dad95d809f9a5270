//! Cooperative cancellation shared between the CLI and the sync pipeline.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable handle to a shared cancellation flag.
///
/// The pipeline polls this between discrete filesystem operations; it never
/// interrupts a single file copy. Every clone observes the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Raw flag, handed to gitoxide as its interrupt signal.
    pub fn as_flag(&self) -> &AtomicBool {
        &self.flag
    }
}
