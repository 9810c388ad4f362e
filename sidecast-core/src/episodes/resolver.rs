//! Episode picker state machine.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::catalog::placeholder_seasons;
use super::{CatalogError, Episode, Season, SeriesAsset, SeriesMetadataProvider, WatchProgress};
use crate::config::CatalogConfig;

/// Lifecycle of one episode-picker interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    /// No load attempted yet
    Uninitialized,
    /// Catalog available, initial season preselected
    Loaded,
    /// User picked a season
    SeasonSelected(u32),
}

/// Where the current catalog came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Real data from the series metadata collaborator
    Remote,
    /// Synthesized fallback, with the reason real data is missing
    Placeholder { reason: CatalogError },
}

impl CatalogSource {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }
}

/// The episode the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeSelection {
    pub season: u32,
    pub episode: u32,
}

/// Resolves which episode of a series the user is requesting.
#[derive(Debug)]
pub struct EpisodeResolver {
    provider: Option<Arc<dyn SeriesMetadataProvider>>,
    config: CatalogConfig,
    asset: SeriesAsset,
    state: ResolverState,
    source: Option<CatalogSource>,
    selected_season: Option<u32>,
    visible: Vec<Episode>,
}

impl EpisodeResolver {
    /// Creates a resolver for one interaction.
    ///
    /// Without a provider every load degrades to the placeholder catalog.
    pub fn new(
        provider: Option<Arc<dyn SeriesMetadataProvider>>,
        config: CatalogConfig,
        progress: WatchProgress,
    ) -> Self {
        Self {
            provider,
            config,
            asset: SeriesAsset {
                seasons: Vec::new(),
                progress,
            },
            state: ResolverState::Uninitialized,
            source: None,
            selected_season: None,
            visible: Vec::new(),
        }
    }

    pub fn state(&self) -> ResolverState {
        self.state
    }

    pub fn asset(&self) -> &SeriesAsset {
        &self.asset
    }

    pub fn seasons(&self) -> &[Season] {
        &self.asset.seasons
    }

    /// Origin of the current catalog, `None` before the first load.
    pub fn catalog_source(&self) -> Option<&CatalogSource> {
        self.source.as_ref()
    }

    pub fn selected_season(&self) -> Option<u32> {
        self.selected_season
    }

    /// Episodes of the selected season with watched flags applied.
    pub fn visible_episodes(&self) -> &[Episode] {
        &self.visible
    }

    /// Loads the catalog for `series_id`.
    ///
    /// Always ends in [`ResolverState::Loaded`]. Collaborator failures and
    /// empty catalogs are logged and replaced by the placeholder catalog.
    pub async fn load_catalog(&mut self, series_id: &str) -> &CatalogSource {
        let fetched = match &self.provider {
            Some(provider) => match provider.fetch_seasons(series_id).await {
                Ok(seasons) if seasons.is_empty() => Err(CatalogError::EmptyCatalog {
                    series_id: series_id.to_string(),
                }),
                other => other,
            },
            None => Err(CatalogError::ServiceUnavailable),
        };

        let source = match fetched {
            Ok(mut seasons) => {
                seasons.sort_by_key(|season| season.number);
                info!(series_id, seasons = seasons.len(), "Loaded series catalog");
                self.asset.seasons = seasons;
                CatalogSource::Remote
            }
            Err(reason) => {
                warn!(series_id, %reason, "Using placeholder series catalog");
                self.asset.seasons = placeholder_seasons(&self.config);
                CatalogSource::Placeholder { reason }
            }
        };

        self.state = ResolverState::Loaded;
        let initial = self.initial_season();
        self.selected_season = initial;
        self.visible = initial
            .map(|season| self.episodes_for(season))
            .unwrap_or_default();

        self.source.insert(source)
    }

    /// Selects a season and recomputes its visible episodes.
    ///
    /// A season missing from the catalog yields an empty list. Before a
    /// catalog is loaded nothing changes.
    pub fn select_season(&mut self, season: u32) -> &[Episode] {
        if self.state == ResolverState::Uninitialized {
            debug!(season, "Ignoring season selection before catalog load");
            return &self.visible;
        }

        self.state = ResolverState::SeasonSelected(season);
        self.selected_season = Some(season);
        self.visible = self.episodes_for(season);
        &self.visible
    }

    /// Returns whether an episode is in the watched set.
    pub fn is_episode_watched(&self, season: u32, episode: u32) -> bool {
        self.asset.progress.is_watched(season, episode)
    }

    /// The last-watched position, if it exists in the loaded catalog.
    pub fn continue_target(&self) -> Option<EpisodeSelection> {
        let progress = &self.asset.progress;
        let season = progress.last_watched_season?;
        let episode = progress.last_watched_episode?;

        self.asset
            .season(season)?
            .episodes
            .iter()
            .any(|candidate| candidate.number == episode)
            .then_some(EpisodeSelection { season, episode })
    }

    /// Ends the interaction with the chosen episode of the selected season.
    ///
    /// Returns `None` when no season is selected or the episode is not in it.
    /// Watched state is not updated here.
    pub fn select_episode(self, episode: u32) -> Option<EpisodeSelection> {
        let season = self.selected_season?;
        if !self.visible.iter().any(|candidate| candidate.number == episode) {
            debug!(season, episode, "Episode not in selected season");
            return None;
        }

        info!(season, episode, "Episode selected");
        Some(EpisodeSelection { season, episode })
    }

    fn initial_season(&self) -> Option<u32> {
        self.asset
            .progress
            .last_watched_season
            .filter(|season| self.asset.season(*season).is_some())
            .or_else(|| self.asset.seasons.first().map(|season| season.number))
    }

    fn episodes_for(&self, season: u32) -> Vec<Episode> {
        let progress = &self.asset.progress;
        self.asset
            .season(season)
            .map(|found| {
                found
                    .episodes
                    .iter()
                    .map(|episode| Episode {
                        watched: progress.is_watched(season, episode.number),
                        is_last_watched: progress.is_last_watched(season, episode.number),
                        ..episode.clone()
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::test_mocks::{FailingSeriesProvider, StaticSeriesProvider};

    fn two_seasons() -> Vec<Season> {
        (1..=2)
            .map(|number| Season {
                number,
                name: format!("Season {number}"),
                episodes: (1..=4)
                    .map(|episode| Episode::new(episode, format!("S{number}E{episode}")))
                    .collect(),
            })
            .collect()
    }

    fn progress(season: u32, episode: u32) -> WatchProgress {
        WatchProgress {
            last_watched_season: Some(season),
            last_watched_episode: Some(episode),
            watched: HashSet::from([(1, 1), (1, 2), (1, 3)]),
        }
    }

    fn resolver_with(seasons: Vec<Season>, progress: WatchProgress) -> EpisodeResolver {
        EpisodeResolver::new(
            Some(Arc::new(StaticSeriesProvider::new(seasons))),
            CatalogConfig::default(),
            progress,
        )
    }

    #[tokio::test]
    async fn test_continue_flag_only_in_last_watched_season() {
        let mut resolver = resolver_with(two_seasons(), progress(1, 3));
        resolver.load_catalog("tt0903747").await;

        let season_one = resolver.select_season(1).to_vec();
        let flagged: Vec<u32> = season_one
            .iter()
            .filter(|episode| episode.is_last_watched)
            .map(|episode| episode.number)
            .collect();
        assert_eq!(flagged, vec![3]);

        let season_two = resolver.select_season(2);
        assert!(season_two.iter().all(|episode| !episode.is_last_watched));
        assert_eq!(resolver.state(), ResolverState::SeasonSelected(2));
    }

    #[tokio::test]
    async fn test_watched_flags_follow_watched_set() {
        let mut resolver = resolver_with(two_seasons(), progress(1, 3));
        resolver.load_catalog("tt0903747").await;

        let watched: Vec<bool> = resolver
            .select_season(1)
            .iter()
            .map(|episode| episode.watched)
            .collect();
        assert_eq!(watched, vec![true, true, true, false]);
        assert!(resolver.is_episode_watched(1, 2));
        assert!(!resolver.is_episode_watched(2, 2));
    }

    #[tokio::test]
    async fn test_load_preselects_last_watched_season() {
        let mut resolver = resolver_with(two_seasons(), progress(2, 1));
        let source = resolver.load_catalog("tt0903747").await;

        assert_eq!(source, &CatalogSource::Remote);
        assert_eq!(resolver.state(), ResolverState::Loaded);
        assert_eq!(resolver.selected_season(), Some(2));
        assert!(resolver.visible_episodes()[0].is_last_watched);
    }

    #[tokio::test]
    async fn test_load_defaults_to_first_season() {
        let mut resolver = resolver_with(two_seasons(), WatchProgress::default());
        resolver.load_catalog("tt0903747").await;

        assert_eq!(resolver.selected_season(), Some(1));
        assert_eq!(resolver.continue_target(), None);
    }

    #[tokio::test]
    async fn test_failing_provider_degrades_to_placeholder() {
        let mut resolver = EpisodeResolver::new(
            Some(Arc::new(FailingSeriesProvider)),
            CatalogConfig::default(),
            WatchProgress::default(),
        );

        let source = resolver.load_catalog("tt0903747").await.clone();

        assert!(source.is_placeholder());
        assert_eq!(resolver.state(), ResolverState::Loaded);
        assert_eq!(resolver.seasons().len(), 5);
        assert_eq!(resolver.visible_episodes().len(), 10);
    }

    #[tokio::test]
    async fn test_empty_catalog_and_missing_provider_degrade() {
        let mut resolver = resolver_with(Vec::new(), WatchProgress::default());
        let source = resolver.load_catalog("tt1").await.clone();
        assert!(matches!(
            source,
            CatalogSource::Placeholder {
                reason: CatalogError::EmptyCatalog { .. }
            }
        ));

        let mut resolver =
            EpisodeResolver::new(None, CatalogConfig::default(), WatchProgress::default());
        let source = resolver.load_catalog("tt1").await.clone();
        assert_eq!(
            source,
            CatalogSource::Placeholder {
                reason: CatalogError::ServiceUnavailable
            }
        );
        assert!(!resolver.seasons().is_empty());
    }

    #[tokio::test]
    async fn test_select_episode_emits_tuple() {
        let mut resolver = resolver_with(two_seasons(), progress(1, 3));
        resolver.load_catalog("tt0903747").await;
        resolver.select_season(2);

        assert_eq!(
            resolver.continue_target(),
            Some(EpisodeSelection {
                season: 1,
                episode: 3
            })
        );
        assert_eq!(
            resolver.select_episode(4),
            Some(EpisodeSelection {
                season: 2,
                episode: 4
            })
        );
    }

    #[tokio::test]
    async fn test_select_missing_episode_or_season() {
        let mut resolver = resolver_with(two_seasons(), WatchProgress::default());
        resolver.load_catalog("tt0903747").await;

        assert!(resolver.select_season(9).is_empty());
        assert_eq!(resolver.select_episode(1), None);
    }

    #[test]
    fn test_selection_before_load_is_ignored() {
        let mut resolver =
            EpisodeResolver::new(None, CatalogConfig::default(), WatchProgress::default());

        assert!(resolver.select_season(1).is_empty());
        assert_eq!(resolver.state(), ResolverState::Uninitialized);
        assert_eq!(resolver.select_episode(1), None);
    }
}
