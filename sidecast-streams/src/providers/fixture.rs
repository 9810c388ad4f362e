//! Stream lists read from JSON files.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;

use super::{StreamDiscoveryProvider, StreamQuery};
use crate::errors::StreamsError;
use crate::types::StreamDescriptor;

#[derive(Deserialize)]
#[serde(untagged)]
enum StreamListFile {
    Wrapped { streams: Vec<StreamDescriptor> },
    Bare(Vec<StreamDescriptor>),
}

/// Serves the stream list stored in a JSON file for every query.
///
/// Accepts either an addon response (`{"streams": [...]}`) or a bare array.
#[derive(Debug, Clone)]
pub struct FixtureProvider {
    path: PathBuf,
}

impl FixtureProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parses stream list JSON.
    ///
    /// # Errors
    /// - `StreamsError::InvalidStreamList` - The text is not a stream list
    pub fn parse_list(json: &str) -> Result<Vec<StreamDescriptor>, StreamsError> {
        let list: StreamListFile =
            serde_json::from_str(json).map_err(|e| StreamsError::InvalidStreamList {
                reason: e.to_string(),
            })?;

        Ok(match list {
            StreamListFile::Wrapped { streams } => streams,
            StreamListFile::Bare(streams) => streams,
        })
    }
}

#[async_trait]
impl StreamDiscoveryProvider for FixtureProvider {
    async fn discover_streams(
        &self,
        query: &StreamQuery,
    ) -> Result<Vec<StreamDescriptor>, StreamsError> {
        let json = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            StreamsError::DiscoveryFailed {
                media_id: query.addon_id(),
                reason: format!("{}: {e}", self.path.display()),
            }
        })?;

        let streams = Self::parse_list(&json)?;
        tracing::debug!(count = streams.len(), path = %self.path.display(), "Loaded stream fixture");
        Ok(streams)
    }
}
