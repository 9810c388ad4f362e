//! Series season/episode resolution
//!
//! Tracks the season catalog of one series and which episode the user is
//! asking for. Catalog data comes from a series metadata collaborator; when
//! that is missing or fails, a placeholder catalog keeps the picker usable.

pub mod catalog;
pub mod resolver;

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use catalog::placeholder_seasons;
pub use resolver::{CatalogSource, EpisodeResolver, EpisodeSelection, ResolverState};

/// Errors from the series metadata collaborator.
///
/// These never reach the resolver's caller; they only explain why the
/// placeholder catalog is in use.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Series metadata fetch failed for {series_id}: {reason}")]
    FetchFailed { series_id: String, reason: String },

    #[error("Series metadata for {series_id} has no seasons")]
    EmptyCatalog { series_id: String },

    #[error("No series metadata service configured")]
    ServiceUnavailable,
}

/// One episode as shown in the picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub number: u32,
    #[serde(default)]
    pub title: String,
    /// Derived from the series watched set
    #[serde(default)]
    pub watched: bool,
    /// Derived from the last-watched pointer
    #[serde(default)]
    pub is_last_watched: bool,
}

impl Episode {
    pub fn new(number: u32, title: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            watched: false,
            is_last_watched: false,
        }
    }
}

/// One season of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub number: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

/// Watch progress for a series, supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WatchProgress {
    pub last_watched_season: Option<u32>,
    pub last_watched_episode: Option<u32>,
    pub watched: HashSet<(u32, u32)>,
}

impl WatchProgress {
    /// Returns whether `(season, episode)` is in the watched set.
    pub fn is_watched(&self, season: u32, episode: u32) -> bool {
        self.watched.contains(&(season, episode))
    }

    /// Returns whether `(season, episode)` is the last-watched position.
    pub fn is_last_watched(&self, season: u32, episode: u32) -> bool {
        self.last_watched_season == Some(season) && self.last_watched_episode == Some(episode)
    }
}

/// Series state owned by one episode-picker interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesAsset {
    pub seasons: Vec<Season>,
    pub progress: WatchProgress,
}

impl SeriesAsset {
    pub fn season(&self, number: u32) -> Option<&Season> {
        self.seasons.iter().find(|season| season.number == number)
    }
}

/// Series metadata collaborator.
#[async_trait]
pub trait SeriesMetadataProvider: Send + Sync + std::fmt::Debug {
    /// Fetches the season/episode catalog for a series.
    ///
    /// # Errors
    /// - `CatalogError::FetchFailed` - The service could not be reached or answered with an error
    async fn fetch_seasons(&self, series_id: &str) -> Result<Vec<Season>, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_from_json() {
        let progress: WatchProgress = serde_json::from_str(
            r#"{"lastWatchedSeason": 1, "lastWatchedEpisode": 3, "watched": [[1, 1], [1, 2]]}"#,
        )
        .unwrap();

        assert!(progress.is_watched(1, 2));
        assert!(!progress.is_watched(1, 3));
        assert!(progress.is_last_watched(1, 3));
        assert!(!progress.is_last_watched(2, 3));
    }

    #[test]
    fn test_season_defaults() {
        let season: Season = serde_json::from_str(r#"{"number": 2}"#).unwrap();
        assert_eq!(season.number, 2);
        assert!(season.episodes.is_empty());
    }
}
