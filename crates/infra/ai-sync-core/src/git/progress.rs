use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use gix::progress::{Count, Id, MessageLevel, NestedProgress, Progress, StepShared, Unit};

const REDRAW_INTERVAL: Duration = Duration::from_millis(50);
const UNBOUNDED: usize = usize::MAX;

/// Single-line transfer progress for gitoxide, drawn on stderr.
///
/// A hidden instance still counts but never draws, so quiet runs share the
/// clone code path.
#[derive(Clone)]
pub struct TransferProgress {
    label: String,
    visible: bool,
    position: StepShared,
    total: Arc<AtomicUsize>,
    last_draw: Arc<Mutex<Option<Instant>>>,
}

impl TransferProgress {
    pub fn new(label: impl Into<String>, visible: bool) -> Self {
        Self {
            label: label.into(),
            visible,
            position: Arc::new(AtomicUsize::new(0)),
            total: Arc::new(AtomicUsize::new(UNBOUNDED)),
            last_draw: Arc::new(Mutex::new(None)),
        }
    }

    fn render_line(&self) -> String {
        let position = self.position.load(Ordering::Relaxed);
        match self.total.load(Ordering::Relaxed) {
            UNBOUNDED | 0 => format!("  {}: {position}", self.label),
            total => {
                let percent = position as f64 * 100.0 / total as f64;
                format!("  {}: {position}/{total} ({percent:.1}%)", self.label)
            }
        }
    }

    /// Redraw at most once per interval while the total is known.
    fn redraw(&self) {
        if !self.visible {
            return;
        }
        let now = Instant::now();
        let bounded = self.total.load(Ordering::Relaxed) != UNBOUNDED;
        match self.last_draw.lock() {
            Ok(mut last) => {
                if bounded && last.is_some_and(|t| now.duration_since(t) < REDRAW_INTERVAL) {
                    return;
                }
                *last = Some(now);
            }
            Err(_) => return,
        }

        let mut stderr = std::io::stderr().lock();
        // Progress output is best effort.
        write!(stderr, "\r{}", self.render_line()).ok();
        stderr.flush().ok();
    }

    fn has_drawn(&self) -> bool {
        self.last_draw.lock().is_ok_and(|last| last.is_some())
    }

    /// Move past the progress line before anything else is printed.
    fn end_line(&self) {
        if self.visible && self.has_drawn() && let Ok(mut last) = self.last_draw.lock() {
            *last = None;
            eprintln!();
        }
    }
}

impl Count for TransferProgress {
    fn set(&self, step: usize) {
        self.position.store(step, Ordering::Relaxed);
        self.redraw();
    }

    fn step(&self) -> usize {
        self.position.load(Ordering::Relaxed)
    }

    fn inc_by(&self, step: usize) {
        self.position.fetch_add(step, Ordering::Relaxed);
        self.redraw();
    }

    fn counter(&self) -> StepShared {
        Arc::clone(&self.position)
    }
}

impl Progress for TransferProgress {
    fn init(&mut self, max: Option<usize>, _unit: Option<Unit>) {
        self.total.store(max.unwrap_or(UNBOUNDED), Ordering::Relaxed);
        self.position.store(0, Ordering::Relaxed);
        self.redraw();
    }

    fn set_name(&mut self, name: String) {
        self.label = name;
    }

    fn name(&self) -> Option<String> {
        Some(self.label.clone())
    }

    fn id(&self) -> Id {
        *b"aisy"
    }

    fn message(&self, _level: MessageLevel, message: String) {
        tracing::trace!(stage = %self.label, "{message}");
    }
}

impl NestedProgress for TransferProgress {
    type SubProgress = Self;

    fn add_child(&mut self, name: impl Into<String>) -> Self::SubProgress {
        self.end_line();
        Self::new(name, self.visible)
    }

    fn add_child_with_id(&mut self, name: impl Into<String>, _id: Id) -> Self::SubProgress {
        self.add_child(name)
    }
}

impl Drop for TransferProgress {
    fn drop(&mut self) {
        // Clones share the draw state; only the last one ends the line.
        if Arc::strong_count(&self.last_draw) == 1 {
            self.end_line();
        }
    }
}
