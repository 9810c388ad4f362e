//! Picking an episode and listing its streams.

use std::collections::HashSet;
use std::sync::Arc;

use sidecast_core::SidecastConfig;
use sidecast_core::episodes::{
    CatalogSource, Episode, EpisodeResolver, EpisodeSelection, Season, WatchProgress,
};
use sidecast_core::handover::ContainerFormat;
use sidecast_core::test_mocks::{FailingSeriesProvider, StaticSeriesProvider};
use sidecast_streams::{HdrFormat, Resolution, StreamListService, StreamQuery, VideoCodec};

use crate::common::JsonAddon;

fn breaking_bad() -> Vec<Season> {
    // Out of order on purpose; the resolver sorts by number
    [2u32, 1]
        .into_iter()
        .map(|number| Season {
            number,
            name: format!("Season {number}"),
            episodes: (1..=7)
                .map(|episode| Episode::new(episode, format!("Episode {episode}")))
                .collect(),
        })
        .collect()
}

fn progress() -> WatchProgress {
    WatchProgress {
        last_watched_season: Some(1),
        last_watched_episode: Some(3),
        watched: HashSet::from([(1, 1), (1, 2)]),
    }
}

#[tokio::test]
async fn test_continue_watching_to_stream_list() {
    let config = SidecastConfig::for_testing();
    let mut resolver = EpisodeResolver::new(
        Some(Arc::new(StaticSeriesProvider::new(breaking_bad()))),
        config.catalog,
        progress(),
    );

    assert_eq!(
        resolver.load_catalog("tt0903747").await,
        &CatalogSource::Remote
    );
    let numbers: Vec<u32> = resolver.seasons().iter().map(|s| s.number).collect();
    assert_eq!(numbers, vec![1, 2]);
    assert_eq!(resolver.selected_season(), Some(1));

    let target = resolver.continue_target().unwrap();
    let selection = resolver.select_episode(target.episode).unwrap();
    assert_eq!(
        selection,
        EpisodeSelection {
            season: 1,
            episode: 3
        }
    );

    let service = StreamListService::new(Arc::new(JsonAddon));
    let query = StreamQuery::episode("tt0903747", selection.season, selection.episode);
    let streams = service.list_streams(&query).await.unwrap();

    assert_eq!(streams.len(), 3);

    let first = &streams[0];
    assert_eq!(first.display_name, "Show.S01E03.2160p.WEB-DL.DV.HEVC");
    assert_eq!(first.format, ContainerFormat::Mkv);
    assert_eq!(first.metadata.addon.as_deref(), Some("Torrentio"));
    assert_eq!(first.metadata.size.as_deref(), Some("9.7 GB"));
    assert_eq!(first.metadata.seeder_count(), Some(88));
    assert_eq!(first.metadata.codec, Some(VideoCodec::Hevc));
    assert_eq!(first.metadata.hdr, Some(HdrFormat::DolbyVision));
    assert_eq!(first.metadata.resolution, Some(Resolution::Uhd2160));

    let second = &streams[1];
    assert_eq!(second.display_name, "Show.S01E03.1080p.WEB.x264");
    assert_eq!(second.format, ContainerFormat::Mp4);
    assert_eq!(second.metadata.seeders.as_deref(), Some("12"));
    assert_eq!(second.metadata.size.as_deref(), Some("1.4 GB"));
    assert_eq!(second.metadata.codec, Some(VideoCodec::X264));
    assert_eq!(second.metadata.addon, None);

    let third = &streams[2];
    assert_eq!(third.display_name, "Stream 3");
    assert_eq!(third.format, ContainerFormat::Unknown);
    assert_eq!(third.metadata.seeders, None);
    assert!(third.metadata.badges().is_empty());
}

#[tokio::test]
async fn test_browsing_other_season_keeps_continue_marker_scoped() {
    let config = SidecastConfig::for_testing();
    let mut resolver = EpisodeResolver::new(
        Some(Arc::new(StaticSeriesProvider::new(breaking_bad()))),
        config.catalog,
        progress(),
    );
    resolver.load_catalog("tt0903747").await;

    let season_two = resolver.select_season(2);
    assert_eq!(season_two.len(), 7);
    assert!(season_two.iter().all(|e| !e.watched && !e.is_last_watched));

    let season_one = resolver.select_season(1);
    let marked: Vec<(u32, bool, bool)> = season_one
        .iter()
        .take(4)
        .map(|e| (e.number, e.watched, e.is_last_watched))
        .collect();
    assert_eq!(
        marked,
        vec![
            (1, true, false),
            (2, true, false),
            (3, false, true),
            (4, false, false)
        ]
    );
}

#[tokio::test]
async fn test_unavailable_metadata_still_allows_selection() {
    let config = SidecastConfig::for_testing();
    let mut resolver = EpisodeResolver::new(
        Some(Arc::new(FailingSeriesProvider)),
        config.catalog.clone(),
        WatchProgress::default(),
    );

    assert!(resolver.load_catalog("tt0903747").await.is_placeholder());
    assert_eq!(
        resolver.seasons().len(),
        config.catalog.placeholder_seasons as usize
    );

    resolver.select_season(2);
    assert_eq!(
        resolver.select_episode(config.catalog.placeholder_episodes),
        Some(EpisodeSelection {
            season: 2,
            episode: config.catalog.placeholder_episodes
        })
    );
}
