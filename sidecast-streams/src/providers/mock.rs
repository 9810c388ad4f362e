//! Mock provider implementation for testing.

use async_trait::async_trait;

use super::{StreamDiscoveryProvider, StreamQuery};
use crate::errors::StreamsError;
use crate::types::StreamDescriptor;

/// Mock provider returning two streams named after the query.
#[derive(Debug, Default)]
pub struct MockProvider {
    fail: bool,
}

impl MockProvider {
    /// Creates a new mock provider for testing.
    pub fn new() -> Self {
        Self { fail: false }
    }

    /// Creates a mock provider that fails every request.
    pub fn failing() -> Self {
        Self { fail: true }
    }
}

#[async_trait]
impl StreamDiscoveryProvider for MockProvider {
    async fn discover_streams(
        &self,
        query: &StreamQuery,
    ) -> Result<Vec<StreamDescriptor>, StreamsError> {
        if self.fail {
            return Err(StreamsError::DiscoveryFailed {
                media_id: query.addon_id(),
                reason: "addon timed out".to_string(),
            });
        }

        let id = query.addon_id();
        Ok(vec![
            StreamDescriptor {
                name: Some("Mock 1080p".to_string()),
                title: Some(format!("{id}.1080p.WEB-DL.x264\n👤 50 💾 1.5 GB")),
                url: Some(format!("https://cdn.example.com/{id}/1080p.mp4")),
                addon_name: Some("Mock".to_string()),
                ..Default::default()
            },
            StreamDescriptor {
                url: Some(format!("https://cdn.example.com/{id}/2160p")),
                filename: Some(format!("{id}.2160p.HDR.x265.mkv")),
                ..Default::default()
            },
        ])
    }
}
