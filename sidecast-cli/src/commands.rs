//! CLI command implementations

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use clap::Subcommand;
use serde::Deserialize;
use sidecast_core::SidecastConfig;
use sidecast_core::episodes::{
    CatalogError, CatalogSource, EpisodeResolver, Season, SeriesMetadataProvider, WatchProgress,
};
use sidecast_core::handover::{
    ContainerFormat, DevicePlayer, DispatchMethod, FormatHint, HandoverDispatcher,
    HandoverRequest, PlaybackMethod, PlayerError,
};
use sidecast_streams::{FixtureProvider, ParsedStream, StreamListService, StreamQuery};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Parse a stream list and print metadata per stream
    Parse {
        /// Addon response or array of stream records
        streams: PathBuf,
        /// Media id the list belongs to
        #[arg(long, default_value = "local")]
        media_id: String,
    },
    /// Show the episode list of a season
    Episodes {
        /// Catalog file with seasons and watch progress
        catalog: PathBuf,
        /// Season to show; defaults to the preselected one
        #[arg(short, long)]
        season: Option<u32>,
    },
    /// Decide and dry-run a handover
    Handover {
        /// Stream URL to hand over
        #[arg(long)]
        url: String,
        /// Target device id
        #[arg(long)]
        device: Option<String>,
        /// Playback method: auto, airplay or vlc
        #[arg(long)]
        method: Option<PlaybackMethod>,
        /// Subtitle track is requested
        #[arg(long)]
        subtitles: bool,
    },
}

/// Handle the CLI command
///
/// # Errors
/// Returns the failure of the command that ran
pub async fn handle_command(command: Commands, config: &SidecastConfig) -> anyhow::Result<()> {
    match command {
        Commands::Parse { streams, media_id } => parse_streams(&streams, media_id).await,
        Commands::Episodes { catalog, season } => show_episodes(&catalog, season, config).await,
        Commands::Handover {
            url,
            device,
            method,
            subtitles,
        } => run_handover(url, device, method, subtitles, config).await,
    }
}

/// Print parsed metadata for every stream in a file
///
/// # Errors
/// - File could not be read or is not a stream list
pub async fn parse_streams(path: &Path, media_id: String) -> anyhow::Result<()> {
    let service = StreamListService::new(Arc::new(FixtureProvider::new(path)));
    let streams = service.list_streams(&StreamQuery::movie(media_id)).await?;

    if streams.is_empty() {
        println!("No streams found");
        return Ok(());
    }

    for (index, stream) in streams.iter().enumerate() {
        print_stream(index, stream);
    }

    Ok(())
}

fn print_stream(index: usize, stream: &ParsedStream) {
    let metadata = &stream.metadata;
    println!("{:>3}. {}", index + 1, stream.display_name);

    let badges = metadata.badges();
    if !badges.is_empty() {
        println!("     {}", badges.join(" | "));
    }
    if let Some(size) = &metadata.size {
        println!("     Size: {size}");
    }
    if let Some(seeders) = &metadata.seeders {
        println!("     Seeders: {seeders}");
    }
    if let Some(addon) = &metadata.addon {
        println!("     Addon: {addon}");
    }
    println!("     Format: {}", stream.format);
}

/// Catalog file layout used by the `episodes` command.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogFile {
    #[serde(default = "default_series_id")]
    series_id: String,
    #[serde(default)]
    seasons: Vec<Season>,
    #[serde(default)]
    progress: WatchProgress,
}

fn default_series_id() -> String {
    "local".to_string()
}

/// Serves seasons read from a catalog file.
#[derive(Debug)]
struct FileSeriesProvider {
    seasons: Vec<Season>,
}

#[async_trait]
impl SeriesMetadataProvider for FileSeriesProvider {
    async fn fetch_seasons(&self, _series_id: &str) -> Result<Vec<Season>, CatalogError> {
        Ok(self.seasons.clone())
    }
}

/// Print the episode list of one season with watched and continue markers
///
/// # Errors
/// - File could not be read or is not a catalog
pub async fn show_episodes(
    path: &Path,
    season: Option<u32>,
    config: &SidecastConfig,
) -> anyhow::Result<()> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading catalog {}", path.display()))?;
    let catalog: CatalogFile = serde_json::from_str(&json)
        .with_context(|| format!("parsing catalog {}", path.display()))?;

    let provider = FileSeriesProvider {
        seasons: catalog.seasons,
    };
    let mut resolver = EpisodeResolver::new(
        Some(Arc::new(provider)),
        config.catalog.clone(),
        catalog.progress,
    );

    if let CatalogSource::Placeholder { reason } = resolver.load_catalog(&catalog.series_id).await
    {
        println!("Series information unavailable ({reason}); showing placeholder episodes");
    }

    if let Some(season) = season {
        resolver.select_season(season);
    }

    let Some(selected) = resolver.selected_season() else {
        println!("No seasons available");
        return Ok(());
    };

    let seasons: Vec<String> = resolver
        .seasons()
        .iter()
        .map(|season| season.number.to_string())
        .collect();
    println!("Seasons: {}", seasons.join(", "));

    if let Some(target) = resolver.continue_target() {
        println!("Continue: S{}E{}", target.season, target.episode);
    }

    println!("Season {selected}:");
    if resolver.visible_episodes().is_empty() {
        println!("  (no episodes)");
    }
    for episode in resolver.visible_episodes() {
        let watched = if episode.watched { "x" } else { " " };
        let marker = if episode.is_last_watched {
            "  <- continue"
        } else {
            ""
        };
        println!(
            "  [{watched}] {:>2}. {}{marker}",
            episode.number, episode.title
        );
    }

    Ok(())
}

/// Device player that logs instead of contacting a device.
#[derive(Debug)]
struct LoggingPlayer;

#[async_trait]
impl DevicePlayer for LoggingPlayer {
    async fn play(
        &self,
        device_id: &str,
        playback_url: &str,
        method: DispatchMethod,
    ) -> Result<(), PlayerError> {
        tracing::info!(device_id, %method, playback_url, "Dry-run playback");
        println!("Would send to {device_id} via {method}: {playback_url}");
        Ok(())
    }
}

/// Decide the handover method and dispatch through a logging player
///
/// # Errors
/// - No usable device, or the dispatch failed
pub async fn run_handover(
    url: String,
    device: Option<String>,
    method: Option<PlaybackMethod>,
    subtitles: bool,
    config: &SidecastConfig,
) -> anyhow::Result<()> {
    let dispatcher = HandoverDispatcher::new(Arc::new(LoggingPlayer), config.handover.clone());

    let container = ContainerFormat::from_url(&url);
    let mut request = HandoverRequest::from_config(url, &config.handover)
        .with_format_hint(FormatHint::new(container).with_subtitles(subtitles));
    if let Some(method) = method {
        request = request.with_method(method);
    }
    if let Some(device) = device {
        request = request.with_device(device);
    }

    let outcome = dispatcher
        .dispatch(&request)
        .await
        .inspect_err(|e| eprintln!("{}", e.user_message()))?;

    println!(
        "Handed over to {} using {}",
        outcome.device_id, outcome.dispatched_method
    );
    if let Some(warning) = outcome.warning {
        println!("Warning: {warning}");
    }

    Ok(())
}
