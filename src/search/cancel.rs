//! Cooperative cancellation for unmix searches.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shared flag polled by the search at bounded intervals.
///
/// Cancellation is cooperative, never preemptive: the requesting context
/// holds one clone and sets it; workers hold another and poll it between
/// batches of frontier expansions. A cancelled search yields exactly
/// [`UnmixOutcome::Cancelled`](crate::search::UnmixOutcome::Cancelled),
/// never a partial best-so-far.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Arm a watchdog that cancels after `delay`. Used by callers that want
    /// a deadline rather than an interactive stop.
    pub fn cancel_after(&self, delay: Duration) {
        let token = self.clone();
        std::thread::spawn(move || {
            std::thread::sleep(delay);
            token.cancel();
        });
    }
}
