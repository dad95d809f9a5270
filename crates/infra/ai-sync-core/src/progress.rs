use std::fmt;

/// Pipeline stages reported to a [`ProgressSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Cloning,
    Downloading,
    Harvesting,
    Copying { total: usize },
    Copied { done: usize, total: usize },
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cloning => f.write_str("Cloning repository..."),
            Self::Downloading => f.write_str("Downloading repository..."),
            Self::Harvesting => f.write_str("Finding copilot files..."),
            Self::Copying { .. } => f.write_str("Copying copilot files..."),
            Self::Copied { done, total } => write!(f, "Copied {done}/{total}"),
        }
    }
}

/// Fire-and-forget stage reporting.
pub trait ProgressSink {
    fn report(&self, stage: Stage);
}

/// Reports stages through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn report(&self, stage: Stage) {
        match stage {
            Stage::Copied { .. } => tracing::debug!("{stage}"),
            _ => tracing::info!("{stage}"),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _stage: Stage) {}
}
