//! Stream discovery collaborators.

use async_trait::async_trait;

use crate::errors::StreamsError;
use crate::types::StreamDescriptor;

pub mod fixture;
#[cfg(test)]
pub mod mock;

pub use fixture::FixtureProvider;
#[cfg(test)]
pub use mock::MockProvider;

/// What to list streams for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamQuery {
    /// Catalog id of the movie or series
    pub media_id: String,
    /// `(season, episode)` for series requests
    pub episode: Option<(u32, u32)>,
}

impl StreamQuery {
    pub fn movie(media_id: impl Into<String>) -> Self {
        Self {
            media_id: media_id.into(),
            episode: None,
        }
    }

    pub fn episode(media_id: impl Into<String>, season: u32, episode: u32) -> Self {
        Self {
            media_id: media_id.into(),
            episode: Some((season, episode)),
        }
    }

    /// Addon-style id, `tt123:1:3` for episodes.
    pub fn addon_id(&self) -> String {
        match self.episode {
            Some((season, episode)) => format!("{}:{season}:{episode}", self.media_id),
            None => self.media_id.clone(),
        }
    }
}

/// Trait for stream discovery providers.
///
/// Implementations return raw descriptors in addon order; the records are
/// weakly typed and may carry any subset of fields.
#[async_trait]
pub trait StreamDiscoveryProvider: Send + Sync + std::fmt::Debug {
    /// Lists stream descriptors for a query.
    ///
    /// # Errors
    /// - `StreamsError::DiscoveryFailed` - The collaborator could not provide a list
    async fn discover_streams(
        &self,
        query: &StreamQuery,
    ) -> Result<Vec<StreamDescriptor>, StreamsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addon_id() {
        assert_eq!(StreamQuery::movie("tt0133093").addon_id(), "tt0133093");
        assert_eq!(
            StreamQuery::episode("tt0903747", 1, 3).addon_id(),
            "tt0903747:1:3"
        );
    }
}
