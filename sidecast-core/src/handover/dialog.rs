//! One handover dialog: single-flight dispatch plus scoped copy feedback.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use super::clipboard::{ClipboardSink, copy_with_fallback};
use super::{
    CopiedIndicator, FallbackSuccess, HandoverDispatcher, HandoverError, HandoverOutcome,
    HandoverRequest,
};
use crate::config::UiConfig;

/// Interaction state owned by one open handover dialog.
///
/// Only one dispatch may be in flight at a time; a second request while the
/// first is pending fails fast without reaching the device. Dropping the
/// dialog drops its copied marker and any pending clear timer.
#[derive(Debug)]
pub struct HandoverDialog {
    dispatcher: HandoverDispatcher,
    in_flight: AtomicBool,
    copied: CopiedIndicator,
}

/// Resets the in-flight flag even if the dispatch future is dropped.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl HandoverDialog {
    pub fn new(dispatcher: HandoverDispatcher, ui: &UiConfig) -> Self {
        Self {
            dispatcher,
            in_flight: AtomicBool::new(false),
            copied: CopiedIndicator::new(ui.copied_timeout()),
        }
    }

    pub fn dispatcher(&self) -> &HandoverDispatcher {
        &self.dispatcher
    }

    /// Returns whether a dispatch is awaiting its result.
    pub fn is_dispatching(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Dispatches a request unless another one is still pending.
    ///
    /// # Errors
    /// - `HandoverError::DispatchInProgress` - A previous dispatch has not resolved yet
    /// - Any error from [`HandoverDispatcher::dispatch`]
    pub async fn dispatch(
        &self,
        request: &HandoverRequest,
    ) -> Result<HandoverOutcome, HandoverError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Rejecting dispatch while another is in flight");
            return Err(HandoverError::DispatchInProgress);
        }
        let _guard = InFlightGuard(&self.in_flight);

        self.dispatcher.dispatch(request).await
    }

    /// Copies a stream URL and marks its list index as copied on success.
    ///
    /// The marker clears after the configured timeout when called inside a
    /// tokio runtime; otherwise it stays until the next copy.
    ///
    /// # Errors
    /// - `HandoverError::ActionFailed` - No clipboard tier succeeded
    pub fn copy_url(
        &mut self,
        sink: &dyn ClipboardSink,
        index: usize,
        stream_url: &str,
    ) -> Result<FallbackSuccess<()>, HandoverError> {
        let success = copy_with_fallback(sink, stream_url)?;
        self.copied.mark(index);
        Ok(success)
    }

    /// Index of the stream currently shown as copied.
    pub fn copied_index(&self) -> Option<usize> {
        self.copied.current()
    }
}
