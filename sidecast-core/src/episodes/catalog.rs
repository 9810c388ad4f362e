//! Placeholder catalog used when no series metadata is available.

use super::{Episode, Season};
use crate::config::CatalogConfig;

/// Builds a generic catalog with the configured number of seasons and episodes.
///
/// Counts are clamped to at least one, so the picker is never empty, and to
/// the `MAX_PLACEHOLDER_*` bounds.
pub fn placeholder_seasons(config: &CatalogConfig) -> Vec<Season> {
    let season_count = config.season_count();
    let episode_count = config.episode_count();

    (1..=season_count)
        .map(|number| Season {
            number,
            name: format!("Season {number}"),
            episodes: (1..=episode_count)
                .map(|episode| Episode::new(episode, format!("Episode {episode}")))
                .collect(),
        })
        .collect()
}
