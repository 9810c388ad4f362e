//! Stream list service combining discovery and parsing.

use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::StreamsError;
use crate::parser::{display_name, parse};
use crate::providers::{StreamDiscoveryProvider, StreamQuery};
use crate::types::{ParsedStream, StreamDescriptor};

/// Lists streams from a discovery provider and annotates each one.
#[derive(Debug, Clone)]
pub struct StreamListService {
    provider: Arc<dyn StreamDiscoveryProvider>,
}

impl StreamListService {
    pub fn new(provider: Arc<dyn StreamDiscoveryProvider>) -> Self {
        Self { provider }
    }

    /// Discovers and parses streams, preserving provider order.
    ///
    /// # Errors
    /// - `StreamsError::DiscoveryFailed` - The provider could not list streams
    pub async fn list_streams(&self, query: &StreamQuery) -> Result<Vec<ParsedStream>, StreamsError> {
        let descriptors = self
            .provider
            .discover_streams(query)
            .await
            .map_err(|e| match e {
                StreamsError::DiscoveryFailed { .. } => e,
                other => StreamsError::DiscoveryFailed {
                    media_id: query.addon_id(),
                    reason: other.to_string(),
                },
            })
            .inspect_err(|e| warn!(media_id = %query.addon_id(), "Stream discovery failed: {e}"))?;

        let streams = annotate(descriptors);
        info!(
            media_id = %query.addon_id(),
            count = streams.len(),
            "Listed streams"
        );
        Ok(streams)
    }
}

/// Parses descriptors into annotated streams in their original order.
pub fn annotate(descriptors: Vec<StreamDescriptor>) -> Vec<ParsedStream> {
    descriptors
        .into_iter()
        .enumerate()
        .map(|(index, descriptor)| ParsedStream {
            metadata: parse(&descriptor),
            display_name: display_name(&descriptor, index),
            format: descriptor.container_format(),
            descriptor,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use sidecast_core::handover::ContainerFormat;

    use super::*;
    use crate::providers::MockProvider;
    use crate::types::{Resolution, VideoCodec};

    #[tokio::test]
    async fn test_lists_in_provider_order() {
        let service = StreamListService::new(Arc::new(MockProvider::new()));
        let streams = service
            .list_streams(&StreamQuery::episode("tt0903747", 1, 3))
            .await
            .unwrap();

        assert_eq!(streams.len(), 2);

        assert_eq!(streams[0].display_name, "Mock 1080p");
        assert_eq!(streams[0].format, ContainerFormat::Mp4);
        assert_eq!(streams[0].metadata.addon.as_deref(), Some("Mock"));
        assert_eq!(streams[0].metadata.size.as_deref(), Some("1.5 GB"));
        assert_eq!(streams[0].metadata.codec, Some(VideoCodec::X264));

        assert_eq!(streams[1].display_name, "tt0903747:1:3.2160p.HDR.x265");
        assert_eq!(streams[1].format, ContainerFormat::Mkv);
        assert_eq!(streams[1].metadata.resolution, Some(Resolution::Uhd2160));
    }

    #[tokio::test]
    async fn test_provider_failure_surfaces() {
        let service = StreamListService::new(Arc::new(MockProvider::failing()));
        let result = service.list_streams(&StreamQuery::movie("tt1")).await;

        assert!(matches!(
            result,
            Err(StreamsError::DiscoveryFailed { ref media_id, .. }) if media_id == "tt1"
        ));
    }

    #[test]
    fn test_annotate_numbers_unnamed_streams() {
        let streams = annotate(vec![StreamDescriptor::default(), StreamDescriptor::default()]);
        let names: Vec<&str> = streams.iter().map(|s| s.display_name.as_str()).collect();
        assert_eq!(names, vec!["Stream 1", "Stream 2"]);
        assert!(streams.iter().all(|s| s.format == ContainerFormat::Unknown));
    }
}
