//! Event throttle: at most one run per window.
//! The first trigger schedules the action one window later; triggers in the
//! meantime are dropped. The throttle re-arms after the action has run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

#[derive(Clone)]
pub struct Throttle {
    window: Duration,
    pending: Arc<AtomicBool>,
}

impl Throttle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Schedule `action` unless a run is already pending.
    /// Returns whether this call scheduled it.
    pub fn trigger<F>(&self, action: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        if self.pending.swap(true, Ordering::AcqRel) {
            trace!("[THROTTLE] dropped");
            return false;
        }

        let pending = Arc::clone(&self.pending);
        let window = self.window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            action();
            pending.store(false, Ordering::Release);
        });
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/throttle.rs"]
mod tests;
