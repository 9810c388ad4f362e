//! Second-screen handover
//!
//! Decides how a chosen stream reaches a playback device and dispatches it
//! through the device-playback collaborator. Also hosts the generic fallback
//! chain reused for utility actions such as copying a stream URL.

pub mod clipboard;
pub mod dialog;
pub mod dispatcher;
pub mod fallback;
pub mod format;
pub mod indicator;
pub mod method;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::HandoverConfig;

pub use clipboard::{ClipboardSink, copy_with_fallback};
pub use dialog::HandoverDialog;
pub use dispatcher::{HandoverDispatcher, ResolvedDevice};
pub use fallback::{FallbackChain, FallbackSuccess, Strategy, attempt_with_fallback};
pub use format::{ContainerFormat, FormatHint};
pub use indicator::CopiedIndicator;
pub use method::{
    MethodDecision, MethodSelector, TargetCapabilities, UNSUPPORTED_FORMAT_WARNING, decide_method,
};

/// Errors surfaced to the user from handover and utility actions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandoverError {
    #[error("No playback device available: {reason}")]
    DeviceUnavailable { reason: String },

    #[error("{action} failed after {attempts} attempts ({last_reason})")]
    ActionFailed {
        action: String,
        attempts: usize,
        last_reason: String,
    },

    #[error("Playback on {device_id} failed: {reason}")]
    DispatchFailed { device_id: String, reason: String },

    #[error("A handover is already in progress")]
    DispatchInProgress,
}

impl HandoverError {
    /// Returns a single human-readable line for the end user.
    pub fn user_message(&self) -> String {
        match self {
            HandoverError::DeviceUnavailable { .. } => {
                "No playback device is configured or available".to_string()
            }
            HandoverError::ActionFailed { action, .. } => format!("Could not {action}"),
            HandoverError::DispatchFailed { device_id, .. } => {
                format!("Could not start playback on {device_id}")
            }
            HandoverError::DispatchInProgress => {
                "Please wait for the current handover to finish".to_string()
            }
        }
    }
}

/// Method requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackMethod {
    /// Let the dispatcher pick based on format and target
    #[default]
    Auto,
    /// Native streaming: the device fetches the URL itself
    Airplay,
    /// Deep link into a player app on the device
    Vlc,
}

impl std::fmt::Display for PlaybackMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Airplay => write!(f, "airplay"),
            Self::Vlc => write!(f, "vlc"),
        }
    }
}

impl std::str::FromStr for PlaybackMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "airplay" => Ok(Self::Airplay),
            "vlc" => Ok(Self::Vlc),
            _ => Err(format!(
                "Invalid playback method: '{s}'. Valid options are: auto, airplay, vlc"
            )),
        }
    }
}

/// Concrete protocol used for a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMethod {
    Airplay,
    Vlc,
}

impl DispatchMethod {
    /// Builds the URL handed to the device for this method.
    pub fn playback_url(&self, stream_url: &str) -> String {
        match self {
            Self::Airplay => stream_url.to_string(),
            Self::Vlc => format!(
                "vlc-x-callback://x-callback-url/stream?url={}",
                urlencoding::encode(stream_url)
            ),
        }
    }
}

impl std::fmt::Display for DispatchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Airplay => write!(f, "airplay"),
            Self::Vlc => write!(f, "vlc"),
        }
    }
}

/// One handover attempt, built by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoverRequest {
    /// Explicit target; the configured default is used when absent
    pub target_device_id: Option<String>,
    pub stream_url: String,
    pub method: PlaybackMethod,
    pub format_hint: FormatHint,
}

impl HandoverRequest {
    /// Creates an `auto` request with the format hint taken from the URL.
    pub fn new(stream_url: impl Into<String>) -> Self {
        let stream_url = stream_url.into();
        let format_hint = FormatHint::new(ContainerFormat::from_url(&stream_url));
        Self {
            target_device_id: None,
            stream_url,
            method: PlaybackMethod::Auto,
            format_hint,
        }
    }

    /// Creates a request using the configured method instead of `auto`.
    pub fn from_config(stream_url: impl Into<String>, config: &HandoverConfig) -> Self {
        Self::new(stream_url).with_method(config.requested_method)
    }

    pub fn with_device(mut self, device_id: impl Into<String>) -> Self {
        self.target_device_id = Some(device_id.into());
        self
    }

    pub fn with_method(mut self, method: PlaybackMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_format_hint(mut self, format_hint: FormatHint) -> Self {
        self.format_hint = format_hint;
        self
    }
}

/// Result of a dispatch the device accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoverOutcome {
    pub device_id: String,
    pub dispatched_method: DispatchMethod,
    /// Advisory text, e.g. when the format may be unsupported
    pub warning: Option<String>,
}

/// Failure reported by the device-playback collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct PlayerError {
    pub reason: String,
}

impl PlayerError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Device-playback collaborator performing the actual protocol invocation.
///
/// Implementations receive the final playback URL, which is a deep link for
/// `DispatchMethod::Vlc` and the raw stream URL otherwise.
#[async_trait]
pub trait DevicePlayer: Send + Sync + std::fmt::Debug {
    /// Starts playback of `playback_url` on the device.
    ///
    /// # Errors
    /// - `PlayerError` - The device rejected or could not be reached
    async fn play(
        &self,
        device_id: &str,
        playback_url: &str,
        method: DispatchMethod,
    ) -> Result<(), PlayerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_method_parsing() {
        assert_eq!("AUTO".parse::<PlaybackMethod>().unwrap(), PlaybackMethod::Auto);
        assert_eq!(" vlc ".parse::<PlaybackMethod>().unwrap(), PlaybackMethod::Vlc);
        assert!("chromecast".parse::<PlaybackMethod>().is_err());
    }

    #[test]
    fn test_vlc_deep_link_encodes_url() {
        let url = DispatchMethod::Vlc.playback_url("https://cdn.example.com/a b.mkv?x=1&y=2");
        assert_eq!(
            url,
            "vlc-x-callback://x-callback-url/stream?url=https%3A%2F%2Fcdn.example.com%2Fa%20b.mkv%3Fx%3D1%26y%3D2"
        );
        assert_eq!(
            DispatchMethod::Airplay.playback_url("https://cdn.example.com/a.mp4"),
            "https://cdn.example.com/a.mp4"
        );
    }

    #[test]
    fn test_request_derives_format_from_url() {
        let request = HandoverRequest::new("https://cdn.example.com/movie.mkv?sig=1");
        assert_eq!(request.format_hint.container, ContainerFormat::Mkv);
        assert_eq!(request.method, PlaybackMethod::Auto);
        assert!(request.target_device_id.is_none());
    }

    #[test]
    fn test_request_from_config_applies_method() {
        let config = HandoverConfig {
            requested_method: PlaybackMethod::Vlc,
            ..Default::default()
        };

        let request = HandoverRequest::from_config("https://cdn.example.com/a.mp4", &config);
        assert_eq!(request.method, PlaybackMethod::Vlc);
        assert_eq!(request.format_hint.container, ContainerFormat::Mp4);
    }

    #[test]
    fn test_user_messages_are_single_line() {
        let errors = [
            HandoverError::DeviceUnavailable {
                reason: "unset".to_string(),
            },
            HandoverError::ActionFailed {
                action: "copy the stream URL".to_string(),
                attempts: 3,
                last_reason: "x".to_string(),
            },
            HandoverError::DispatchInProgress,
        ];

        for error in errors {
            assert!(!error.user_message().contains('\n'));
        }
    }
}
