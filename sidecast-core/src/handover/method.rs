//! Playback method selection.
//!
//! Pure decision logic: given what is known about the stream and the target,
//! pick the protocol used for the handover. No I/O happens here.

use tracing::debug;

use super::{ContainerFormat, DispatchMethod, FormatHint, PlaybackMethod};

/// Advisory attached when the stream is sent natively without a known fit.
pub const UNSUPPORTED_FORMAT_WARNING: &str = "format may not be fully supported";

/// Capabilities of the device receiving the stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetCapabilities {
    /// Device can launch a player app through a deep link
    pub deep_link_player: bool,
}

/// Outcome of method selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecision {
    pub method: DispatchMethod,
    pub warning: Option<String>,
}

/// Chooses a dispatch method for a stream and target.
#[derive(Debug, Clone)]
pub struct MethodSelector {
    native_formats: Vec<ContainerFormat>,
}

impl Default for MethodSelector {
    fn default() -> Self {
        Self::new(vec![
            ContainerFormat::Mp4,
            ContainerFormat::M4v,
            ContainerFormat::Mov,
        ])
    }
}

impl MethodSelector {
    /// Creates a selector with the given natively streamable containers.
    pub fn new(native_formats: Vec<ContainerFormat>) -> Self {
        Self { native_formats }
    }

    /// Returns whether the target can fetch and play this container itself.
    pub fn is_natively_streamable(&self, container: ContainerFormat) -> bool {
        self.native_formats.contains(&container)
    }

    /// Decides how the stream is handed over.
    ///
    /// An explicit method is honored verbatim. For `auto`, native streaming
    /// wins when the container is supported and no subtitle track is needed,
    /// then a deep-link player if the target has one, otherwise native
    /// streaming with an advisory warning.
    pub fn decide(
        &self,
        hint: &FormatHint,
        target: &TargetCapabilities,
        requested: PlaybackMethod,
    ) -> MethodDecision {
        let decision = match requested {
            PlaybackMethod::Airplay => MethodDecision {
                method: DispatchMethod::Airplay,
                warning: None,
            },
            PlaybackMethod::Vlc => MethodDecision {
                method: DispatchMethod::Vlc,
                warning: None,
            },
            PlaybackMethod::Auto => {
                if self.is_natively_streamable(hint.container) && !hint.subtitles_requested {
                    MethodDecision {
                        method: DispatchMethod::Airplay,
                        warning: None,
                    }
                } else if target.deep_link_player {
                    MethodDecision {
                        method: DispatchMethod::Vlc,
                        warning: None,
                    }
                } else {
                    MethodDecision {
                        method: DispatchMethod::Airplay,
                        warning: Some(UNSUPPORTED_FORMAT_WARNING.to_string()),
                    }
                }
            }
        };

        debug!(
            container = %hint.container,
            subtitles = hint.subtitles_requested,
            deep_link = target.deep_link_player,
            %requested,
            method = %decision.method,
            "Decided playback method"
        );

        decision
    }
}

/// Decides a method using the default natively streamable containers.
pub fn decide_method(
    hint: &FormatHint,
    target: &TargetCapabilities,
    requested: PlaybackMethod,
) -> MethodDecision {
    MethodSelector::default().decide(hint, target, requested)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_DEEP_LINK: TargetCapabilities = TargetCapabilities {
        deep_link_player: false,
    };
    const DEEP_LINK: TargetCapabilities = TargetCapabilities {
        deep_link_player: true,
    };

    #[test]
    fn test_mkv_without_deep_link_warns() {
        let hint = FormatHint::new(ContainerFormat::Mkv);
        let decision = decide_method(&hint, &NO_DEEP_LINK, PlaybackMethod::Auto);

        assert_eq!(decision.method, DispatchMethod::Airplay);
        assert_eq!(decision.warning.as_deref(), Some(UNSUPPORTED_FORMAT_WARNING));
    }

    #[test]
    fn test_mkv_with_deep_link_uses_player() {
        let hint = FormatHint::new(ContainerFormat::Mkv);
        let decision = decide_method(&hint, &DEEP_LINK, PlaybackMethod::Auto);

        assert_eq!(decision.method, DispatchMethod::Vlc);
        assert!(decision.warning.is_none());
    }

    #[test]
    fn test_mp4_streams_natively() {
        let hint = FormatHint::new(ContainerFormat::Mp4);

        for target in [NO_DEEP_LINK, DEEP_LINK] {
            let decision = decide_method(&hint, &target, PlaybackMethod::Auto);
            assert_eq!(decision.method, DispatchMethod::Airplay);
            assert!(decision.warning.is_none());
        }
    }

    #[test]
    fn test_subtitles_prefer_deep_link() {
        let hint = FormatHint::new(ContainerFormat::Mp4).with_subtitles(true);

        let decision = decide_method(&hint, &DEEP_LINK, PlaybackMethod::Auto);
        assert_eq!(decision.method, DispatchMethod::Vlc);

        let decision = decide_method(&hint, &NO_DEEP_LINK, PlaybackMethod::Auto);
        assert_eq!(decision.method, DispatchMethod::Airplay);
        assert!(decision.warning.is_some());
    }

    #[test]
    fn test_explicit_method_is_honored() {
        let hint = FormatHint::new(ContainerFormat::Mkv);

        let decision = decide_method(&hint, &NO_DEEP_LINK, PlaybackMethod::Vlc);
        assert_eq!(decision.method, DispatchMethod::Vlc);
        assert!(decision.warning.is_none());

        let decision = decide_method(&hint, &DEEP_LINK, PlaybackMethod::Airplay);
        assert_eq!(decision.method, DispatchMethod::Airplay);
        assert!(decision.warning.is_none());
    }

    #[test]
    fn test_custom_native_set() {
        let selector = MethodSelector::new(vec![ContainerFormat::Mkv]);
        let decision = selector.decide(
            &FormatHint::new(ContainerFormat::Mkv),
            &NO_DEEP_LINK,
            PlaybackMethod::Auto,
        );

        assert_eq!(decision.method, DispatchMethod::Airplay);
        assert!(decision.warning.is_none());
    }
}
