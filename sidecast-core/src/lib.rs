//! Sidecast Core - Episode resolution and second-screen handover
//!
//! This crate provides the decision layer a presentation layer calls when a
//! user picks a series episode and hands a stream over to a playback device:
//! configuration, the episode resolver, the handover dispatcher with its
//! fallback chains, and tracing setup.

pub mod config;
pub mod episodes;
pub mod handover;
pub mod tracing_setup;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_mocks;

// Re-export main types for convenient access
pub use config::SidecastConfig;
pub use episodes::{CatalogError, EpisodeResolver};
pub use handover::{HandoverDialog, HandoverDispatcher, HandoverError};

/// Errors that can bubble up from any Sidecast subsystem.
#[derive(Debug, thiserror::Error)]
pub enum SidecastError {
    #[error("Handover error: {0}")]
    Handover(#[from] HandoverError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SidecastError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            SidecastError::Handover(e) => e.user_message(),
            SidecastError::Catalog(_) => "Series information is unavailable".to_string(),
            SidecastError::Configuration { .. } => "Configuration error occurred".to_string(),
            SidecastError::Io(_) => "File system error occurred".to_string(),
        }
    }

    /// Checks if this error is due to user input or configuration.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            SidecastError::Configuration { .. }
                | SidecastError::Handover(HandoverError::DeviceUnavailable { .. })
        )
    }
}

pub type Result<T> = std::result::Result<T, SidecastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_delegates_to_handover() {
        let error = SidecastError::from(HandoverError::DispatchInProgress);
        assert_eq!(
            error.user_message(),
            "Please wait for the current handover to finish"
        );
        assert!(!error.is_user_error());

        let error = SidecastError::from(HandoverError::DeviceUnavailable {
            reason: "unset".to_string(),
        });
        assert!(error.is_user_error());
    }
}
