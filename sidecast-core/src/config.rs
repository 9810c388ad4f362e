//! Centralized configuration for Sidecast.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::handover::{ContainerFormat, PlaybackMethod};

/// Upper bound on placeholder seasons, whatever the configured value.
pub const MAX_PLACEHOLDER_SEASONS: u32 = 50;
/// Upper bound on episodes per placeholder season.
pub const MAX_PLACEHOLDER_EPISODES: u32 = 100;

/// Central configuration for all Sidecast components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SidecastConfig {
    pub handover: HandoverConfig,
    pub catalog: CatalogConfig,
    pub ui: UiConfig,
}

/// A playback target known to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Device identifier passed to the playback collaborator
    pub id: String,
    /// Friendly name shown to the user
    #[serde(default)]
    pub name: String,
    /// Whether the device can launch a player through a deep link
    #[serde(default)]
    pub deep_link_player: bool,
}

/// Second-screen handover configuration.
///
/// Controls which device receives streams when the caller does not pick
/// one, and which containers the device can play without a helper app.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HandoverConfig {
    /// Device used when a request carries no explicit target
    pub default_device_id: Option<String>,
    /// Method requested when the caller does not override it.
    ///
    /// Applied by [`HandoverRequest::from_config`](crate::handover::HandoverRequest::from_config);
    /// `HandoverRequest::new` always starts from `auto`.
    pub requested_method: PlaybackMethod,
    /// Known playback targets and their capabilities
    pub devices: Vec<DeviceProfile>,
    /// Containers the target can fetch and play natively
    pub native_formats: Vec<ContainerFormat>,
}

impl Default for HandoverConfig {
    fn default() -> Self {
        Self {
            default_device_id: None,
            requested_method: PlaybackMethod::Auto,
            devices: Vec::new(),
            native_formats: vec![
                ContainerFormat::Mp4,
                ContainerFormat::M4v,
                ContainerFormat::Mov,
            ],
        }
    }
}

impl HandoverConfig {
    /// Looks up a configured device profile by id.
    pub fn device(&self, device_id: &str) -> Option<&DeviceProfile> {
        self.devices.iter().find(|device| device.id == device_id)
    }
}

/// Series catalog configuration.
///
/// Shapes the placeholder catalog used when series metadata is unavailable.
///
/// Counts are clamped to `1..=MAX_PLACEHOLDER_*` when the catalog is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Number of seasons in the placeholder catalog
    pub placeholder_seasons: u32,
    /// Number of episodes per placeholder season
    pub placeholder_episodes: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            placeholder_seasons: 5,
            placeholder_episodes: 10,
        }
    }
}

/// Per-dialog interaction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long the "copied" marker stays visible, in milliseconds
    pub copied_timeout_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            copied_timeout_ms: 2000,
        }
    }
}

impl CatalogConfig {
    /// Season count actually used for the placeholder catalog.
    pub fn season_count(&self) -> u32 {
        self.placeholder_seasons.clamp(1, MAX_PLACEHOLDER_SEASONS)
    }

    /// Episodes per season actually used for the placeholder catalog.
    pub fn episode_count(&self) -> u32 {
        self.placeholder_episodes.clamp(1, MAX_PLACEHOLDER_EPISODES)
    }
}

impl UiConfig {
    /// Returns the copied marker timeout as a duration.
    pub fn copied_timeout(&self) -> Duration {
        Duration::from_millis(self.copied_timeout_ms)
    }
}

impl SidecastConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Applies environment variable overrides on top of the current values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(device) = std::env::var("SIDECAST_DEFAULT_DEVICE")
            && !device.trim().is_empty()
        {
            self.handover.default_device_id = Some(device.trim().to_string());
        }

        if let Ok(method) = std::env::var("SIDECAST_METHOD") {
            match method.parse::<PlaybackMethod>() {
                Ok(method) => self.handover.requested_method = method,
                Err(reason) => tracing::warn!("Ignoring SIDECAST_METHOD: {reason}"),
            }
        }

        if let Ok(timeout) = std::env::var("SIDECAST_COPIED_TIMEOUT_MS")
            && let Ok(millis) = timeout.parse::<u64>()
        {
            self.ui.copied_timeout_ms = millis;
        }

        if let Ok(seasons) = std::env::var("SIDECAST_PLACEHOLDER_SEASONS")
            && let Ok(count) = seasons.parse::<u32>()
        {
            self.catalog.placeholder_seasons = count.clamp(1, MAX_PLACEHOLDER_SEASONS);
        }

        if let Ok(episodes) = std::env::var("SIDECAST_PLACEHOLDER_EPISODES")
            && let Ok(count) = episodes.parse::<u32>()
        {
            self.catalog.placeholder_episodes = count.clamp(1, MAX_PLACEHOLDER_EPISODES);
        }
    }

    /// Creates a configuration optimized for testing.
    pub fn for_testing() -> Self {
        Self {
            handover: HandoverConfig {
                default_device_id: Some("living-room".to_string()),
                devices: vec![
                    DeviceProfile {
                        id: "living-room".to_string(),
                        name: "Living Room".to_string(),
                        deep_link_player: true,
                    },
                    DeviceProfile {
                        id: "bedroom".to_string(),
                        name: "Bedroom".to_string(),
                        deep_link_player: false,
                    },
                ],
                ..Default::default()
            },
            catalog: CatalogConfig {
                placeholder_seasons: 2,
                placeholder_episodes: 3,
            },
            ui: UiConfig {
                copied_timeout_ms: 50,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::handover::{HandoverDispatcher, HandoverRequest};
    use crate::test_mocks::RecordingPlayer;

    #[test]
    fn test_default_config_values() {
        let config = SidecastConfig::default();

        assert_eq!(config.handover.default_device_id, None);
        assert_eq!(config.handover.requested_method, PlaybackMethod::Auto);
        assert!(config.handover.native_formats.contains(&ContainerFormat::Mp4));
        assert!(!config.handover.native_formats.contains(&ContainerFormat::Mkv));
        assert_eq!(config.catalog.placeholder_seasons, 5);
        assert_eq!(config.catalog.placeholder_episodes, 10);
        assert_eq!(config.ui.copied_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_device_lookup() {
        let config = SidecastConfig::for_testing();

        assert!(config.handover.device("living-room").unwrap().deep_link_player);
        assert!(!config.handover.device("bedroom").unwrap().deep_link_player);
        assert!(config.handover.device("garage").is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SidecastConfig = serde_json::from_str(
            r#"{"handover": {"default_device_id": "tv", "requested_method": "vlc"}}"#,
        )
        .unwrap();

        assert_eq!(config.handover.default_device_id.as_deref(), Some("tv"));
        assert_eq!(config.handover.requested_method, PlaybackMethod::Vlc);
        assert_eq!(config.handover.native_formats.len(), 3);
        assert_eq!(config.catalog.placeholder_seasons, 5);
    }

    // Only this test touches SIDECAST_* variables
    #[tokio::test]
    async fn test_env_override() {
        unsafe {
            std::env::set_var("SIDECAST_DEFAULT_DEVICE", "office");
        }

        // The default device alone is enough to dispatch
        let config = SidecastConfig::from_env();
        assert!(config.handover.devices.is_empty());
        let player = Arc::new(RecordingPlayer::new());
        let dispatcher = HandoverDispatcher::new(player.clone(), config.handover);
        let outcome = dispatcher
            .dispatch(&HandoverRequest::new("https://cdn.example.com/a.mp4"))
            .await
            .unwrap();
        assert_eq!(outcome.device_id, "office");
        assert_eq!(player.calls()[0].device_id, "office");

        unsafe {
            std::env::set_var("SIDECAST_METHOD", "airplay");
            std::env::set_var("SIDECAST_COPIED_TIMEOUT_MS", "750");
            std::env::set_var("SIDECAST_PLACEHOLDER_SEASONS", "0");
            std::env::set_var("SIDECAST_PLACEHOLDER_EPISODES", "12");
        }

        let config = SidecastConfig::from_env();

        assert_eq!(config.handover.default_device_id.as_deref(), Some("office"));
        assert_eq!(config.handover.requested_method, PlaybackMethod::Airplay);
        assert_eq!(config.ui.copied_timeout_ms, 750);
        assert_eq!(config.catalog.placeholder_seasons, 1);
        assert_eq!(config.catalog.placeholder_episodes, 12);

        unsafe {
            std::env::set_var("SIDECAST_PLACEHOLDER_SEASONS", "4000000000");
            std::env::set_var("SIDECAST_PLACEHOLDER_EPISODES", "4000000000");
        }

        let config = SidecastConfig::from_env();
        assert_eq!(config.catalog.placeholder_seasons, MAX_PLACEHOLDER_SEASONS);
        assert_eq!(config.catalog.placeholder_episodes, MAX_PLACEHOLDER_EPISODES);

        // Cleanup
        unsafe {
            std::env::remove_var("SIDECAST_DEFAULT_DEVICE");
            std::env::remove_var("SIDECAST_METHOD");
            std::env::remove_var("SIDECAST_COPIED_TIMEOUT_MS");
            std::env::remove_var("SIDECAST_PLACEHOLDER_SEASONS");
            std::env::remove_var("SIDECAST_PLACEHOLDER_EPISODES");
        }
    }

    #[test]
    fn test_catalog_counts_clamped() {
        let config: SidecastConfig = serde_json::from_str(
            r#"{"catalog": {"placeholder_seasons": 4000000000, "placeholder_episodes": 0}}"#,
        )
        .unwrap();

        assert_eq!(config.catalog.season_count(), MAX_PLACEHOLDER_SEASONS);
        assert_eq!(config.catalog.episode_count(), 1);
        assert_eq!(CatalogConfig::default().season_count(), 5);
    }
}
