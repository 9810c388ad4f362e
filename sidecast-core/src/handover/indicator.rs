//! Scoped "copied" marker for a handover dialog.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::warn;

#[derive(Debug, Default)]
struct MarkState {
    index: Option<usize>,
    generation: u64,
}

/// Remembers which item was copied last and forgets it after a timeout.
///
/// Each mark replaces the previous one and its timer. Dropping the indicator
/// aborts any pending timer, so nothing outlives the owning dialog.
#[derive(Debug)]
pub struct CopiedIndicator {
    state: Arc<Mutex<MarkState>>,
    timer: Option<JoinHandle<()>>,
    timeout: Duration,
}

impl CopiedIndicator {
    pub fn new(timeout: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(MarkState::default())),
            timer: None,
            timeout,
        }
    }

    /// Marks `index` as copied and schedules it to clear.
    ///
    /// Outside a tokio runtime the mark is kept until the next `mark` or
    /// `clear`, since no timer can be scheduled.
    pub fn mark(&mut self, index: usize) {
        self.cancel_timer();

        let generation = {
            let mut state = self.state.lock();
            state.index = Some(index);
            state.generation += 1;
            state.generation
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(index, "No async runtime, copied marker will not auto-clear");
            return;
        };

        let state = Arc::clone(&self.state);
        let timeout = self.timeout;
        self.timer = Some(runtime.spawn(async move {
            tokio::time::sleep(timeout).await;
            let mut state = state.lock();
            // A newer mark owns the value now
            if state.generation == generation {
                state.index = None;
            }
        }));
    }

    /// Index of the item currently shown as copied.
    pub fn current(&self) -> Option<usize> {
        self.state.lock().index
    }

    /// Returns whether `index` is currently shown as copied.
    pub fn is_marked(&self, index: usize) -> bool {
        self.current() == Some(index)
    }

    /// Clears the marker immediately and cancels its timer.
    pub fn clear(&mut self) {
        self.cancel_timer();
        self.state.lock().index = None;
    }

    /// Returns whether a clear is still scheduled.
    pub fn has_pending_timer(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for CopiedIndicator {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
