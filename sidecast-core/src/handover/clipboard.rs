//! Clipboard copy with tiered fallbacks.

use tracing::{debug, warn};

use super::HandoverError;
use super::fallback::{FallbackChain, FallbackSuccess};

/// Key of the shared slot the last tier writes the value to.
pub const SHARED_SLOT_KEY: &str = "sidecast_last_copied_url";

/// Notification and clipboard sink provided by the host platform.
pub trait ClipboardSink {
    /// Writes through the secure clipboard API.
    ///
    /// # Errors
    /// Returns the reason when the API is unavailable or denied.
    fn write_secure(&self, value: &str) -> Result<(), String>;

    /// Copies through a hidden selectable text element.
    ///
    /// # Errors
    /// Returns the reason when the copy command is rejected.
    fn write_selectable(&self, value: &str) -> Result<(), String>;

    /// Shows a user-visible notification.
    ///
    /// # Errors
    /// Returns the reason when no notification could be shown.
    fn notify(&self, title: &str, message: &str) -> Result<(), String>;

    /// Stores a value in a persisted slot shared with other views.
    ///
    /// # Errors
    /// Returns the reason when the slot cannot be written.
    fn persist(&self, key: &str, value: &str) -> Result<(), String>;
}

/// Copies `value` using the secure clipboard, then a selectable-text copy,
/// then a notification carrying the literal value.
///
/// The last tier also stores the value in a shared slot; a failure there is
/// logged and does not fail the tier.
///
/// # Errors
/// - `HandoverError::ActionFailed` - All three tiers failed
pub fn copy_with_fallback(
    sink: &dyn ClipboardSink,
    value: &str,
) -> Result<FallbackSuccess<()>, HandoverError> {
    let result = FallbackChain::new("copy the stream URL")
        .then("secure clipboard", || sink.write_secure(value))
        .then("selectable text", || sink.write_selectable(value))
        .then("notification", || {
            sink.notify("Stream URL", value)?;
            if let Err(reason) = sink.persist(SHARED_SLOT_KEY, value) {
                warn!(%reason, "Could not persist copied URL");
            }
            Ok(())
        })
        .run();

    if let Ok(success) = &result {
        debug!(tier = success.label, "Copied stream URL");
    }

    result
}
