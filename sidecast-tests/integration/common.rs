//! Shared fixtures for integration tests.

use async_trait::async_trait;
use sidecast_streams::{StreamDescriptor, StreamDiscoveryProvider, StreamQuery, StreamsError};

/// Raw addon response mixing the shapes different addons produce.
pub const ADDON_RESPONSE: &str = r#"{
    "streams": [
        {
            "name": "Torrentio\n4k DV | HDR",
            "title": "Show.S01E03.2160p.WEB-DL.DV.HEVC.DDP5.1.Atmos\n👤 88 💾 9.7 GB ⚙️ EZTV",
            "url": "https://debrid.example.com/dl/abc/Show.S01E03.2160p.mkv",
            "behaviorHints": {"bingeGroup": "torrentio|4k", "filename": "Show.S01E03.2160p.WEB-DL.DV.HEVC.mkv"},
            "addonName": "Torrentio"
        },
        {
            "name": "Direct",
            "description": "Show.S01E03.1080p.WEB.x264\nSeeders: 12 | 1.4 GB",
            "url": "https://cdn.example.com/show/s01e03.mp4?token=xyz"
        },
        {
            "url": "https://cdn.example.com/show/s01e03",
            "title": null,
            "seeders": 5
        }
    ]
}"#;

/// Answers every query with the records of [`ADDON_RESPONSE`].
#[derive(Debug)]
pub struct JsonAddon;

#[async_trait]
impl StreamDiscoveryProvider for JsonAddon {
    async fn discover_streams(
        &self,
        _query: &StreamQuery,
    ) -> Result<Vec<StreamDescriptor>, StreamsError> {
        let response: serde_json::Value =
            serde_json::from_str(ADDON_RESPONSE).map_err(|e| StreamsError::InvalidStreamList {
                reason: e.to_string(),
            })?;

        let streams = response["streams"]
            .as_array()
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(StreamDescriptor::from)
            .collect();

        Ok(streams)
    }
}

