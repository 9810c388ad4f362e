//! Handover dispatch to the device-playback collaborator.

use std::sync::Arc;

use tracing::{info, warn};

use super::fallback::FallbackChain;
use super::method::{MethodSelector, TargetCapabilities};
use super::{DevicePlayer, HandoverError, HandoverOutcome, HandoverRequest, MethodDecision};
use crate::config::HandoverConfig;

/// Device ids the host platform reports for entities that are not usable.
const UNUSABLE_DEVICE_IDS: &[&str] = &["unknown", "unavailable", "none"];

/// A target device and what it can do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDevice {
    pub id: String,
    pub capabilities: TargetCapabilities,
}

/// Decides and dispatches handovers for one interaction.
#[derive(Debug)]
pub struct HandoverDispatcher {
    player: Arc<dyn DevicePlayer>,
    config: HandoverConfig,
    selector: MethodSelector,
}

impl HandoverDispatcher {
    /// Creates a dispatcher bound to a playback collaborator.
    pub fn new(player: Arc<dyn DevicePlayer>, config: HandoverConfig) -> Self {
        let selector = MethodSelector::new(config.native_formats.clone());
        Self {
            player,
            config,
            selector,
        }
    }

    /// Configuration this dispatcher was built with.
    pub fn config(&self) -> &HandoverConfig {
        &self.config
    }

    /// Resolves the effective target device.
    ///
    /// An explicit id takes precedence; otherwise the configured default is
    /// used. Ids missing from the configured devices resolve with no known
    /// capabilities.
    ///
    /// # Errors
    /// - `HandoverError::DeviceUnavailable` - Neither an explicit nor a usable default device
    pub fn resolve_device(&self, explicit: Option<&str>) -> Result<ResolvedDevice, HandoverError> {
        let chain = FallbackChain::new("resolve playback device")
            .then("explicit device", || {
                let id = usable_device_id(explicit).ok_or("no explicit device requested")?;
                Ok(self.profile_for(id))
            })
            .then("default device", || {
                let id = usable_device_id(self.config.default_device_id.as_deref())
                    .ok_or("no default device configured")?;
                Ok(self.profile_for(id))
            });

        chain
            .run()
            .map(|success| success.value)
            .map_err(|error| match error {
                HandoverError::ActionFailed { last_reason, .. } => {
                    HandoverError::DeviceUnavailable {
                        reason: last_reason,
                    }
                }
                other => other,
            })
    }

    /// Decides the method for a request against a resolved device.
    pub fn decide(&self, request: &HandoverRequest, device: &ResolvedDevice) -> MethodDecision {
        self.selector
            .decide(&request.format_hint, &device.capabilities, request.method)
    }

    /// Dispatches a request to its target device.
    ///
    /// Makes exactly one outbound call when a device resolves and none when
    /// it does not. Failures are returned as-is and never retried.
    ///
    /// # Errors
    /// - `HandoverError::DeviceUnavailable` - No target device could be resolved
    /// - `HandoverError::DispatchFailed` - The playback collaborator rejected the call
    pub async fn dispatch(
        &self,
        request: &HandoverRequest,
    ) -> Result<HandoverOutcome, HandoverError> {
        let device = self.resolve_device(request.target_device_id.as_deref())?;
        let decision = self.decide(request, &device);

        if let Some(warning) = &decision.warning {
            warn!(device = %device.id, container = %request.format_hint.container, "{warning}");
        }

        let playback_url = decision.method.playback_url(&request.stream_url);
        info!(device = %device.id, method = %decision.method, "Dispatching stream to device");

        self.player
            .play(&device.id, &playback_url, decision.method)
            .await
            .map_err(|error| HandoverError::DispatchFailed {
                device_id: device.id.clone(),
                reason: error.reason,
            })?;

        Ok(HandoverOutcome {
            device_id: device.id,
            dispatched_method: decision.method,
            warning: decision.warning,
        })
    }

    fn profile_for(&self, id: &str) -> ResolvedDevice {
        let capabilities = self
            .config
            .device(id)
            .map(|profile| TargetCapabilities {
                deep_link_player: profile.deep_link_player,
            })
            .unwrap_or_default();

        ResolvedDevice {
            id: id.to_string(),
            capabilities,
        }
    }
}

fn usable_device_id(id: Option<&str>) -> Option<&str> {
    let id = id?.trim();
    if id.is_empty() || UNUSABLE_DEVICE_IDS.contains(&id.to_ascii_lowercase().as_str()) {
        None
    } else {
        Some(id)
    }
}
