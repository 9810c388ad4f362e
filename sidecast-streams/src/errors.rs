//! Error types for stream discovery.

use thiserror::Error;

/// Errors that can occur while obtaining stream lists.
#[derive(Debug, Error)]
pub enum StreamsError {
    /// The discovery collaborator failed for the given media id.
    #[error("Stream discovery failed for '{media_id}': {reason}")]
    DiscoveryFailed {
        /// Media id that was requested
        media_id: String,
        /// The reason for the failure
        reason: String,
    },

    /// Stream list data could not be read.
    #[error("Invalid stream list: {reason}")]
    InvalidStreamList {
        /// The reason the data was rejected
        reason: String,
    },

    /// Reading a stream list from disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
