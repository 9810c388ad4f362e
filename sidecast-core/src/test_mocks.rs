//! Mock collaborators for testing handover and episode resolution.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::episodes::{CatalogError, Season, SeriesMetadataProvider};
use crate::handover::{ClipboardSink, DevicePlayer, DispatchMethod, PlayerError};

/// One call received by a mock player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayCall {
    pub device_id: String,
    pub playback_url: String,
    pub method: DispatchMethod,
}

/// Player that records every call and optionally fails them.
#[derive(Debug, Default)]
pub struct RecordingPlayer {
    calls: Mutex<Vec<PlayCall>>,
    failure: Option<String>,
}

impl RecordingPlayer {
    /// Creates a player that accepts every call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a player that rejects every call with `reason`.
    pub fn failing(reason: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Some(reason.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<PlayCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl DevicePlayer for RecordingPlayer {
    async fn play(
        &self,
        device_id: &str,
        playback_url: &str,
        method: DispatchMethod,
    ) -> Result<(), PlayerError> {
        self.calls.lock().push(PlayCall {
            device_id: device_id.to_string(),
            playback_url: playback_url.to_string(),
            method,
        });

        match &self.failure {
            Some(reason) => Err(PlayerError::new(reason.clone())),
            None => Ok(()),
        }
    }
}

/// Player that holds every call until released.
#[derive(Debug, Default)]
pub struct GatedPlayer {
    gate: Notify,
    calls: AtomicUsize,
}

impl GatedPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets one pending (or the next) call complete.
    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DevicePlayer for GatedPlayer {
    async fn play(
        &self,
        _device_id: &str,
        _playback_url: &str,
        _method: DispatchMethod,
    ) -> Result<(), PlayerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(())
    }
}

/// Series provider returning a fixed catalog.
#[derive(Debug, Clone)]
pub struct StaticSeriesProvider {
    seasons: Vec<Season>,
}

impl StaticSeriesProvider {
    pub fn new(seasons: Vec<Season>) -> Self {
        Self { seasons }
    }
}

#[async_trait]
impl SeriesMetadataProvider for StaticSeriesProvider {
    async fn fetch_seasons(&self, _series_id: &str) -> Result<Vec<Season>, CatalogError> {
        Ok(self.seasons.clone())
    }
}

/// Series provider that always fails.
#[derive(Debug, Clone, Default)]
pub struct FailingSeriesProvider;

#[async_trait]
impl SeriesMetadataProvider for FailingSeriesProvider {
    async fn fetch_seasons(&self, series_id: &str) -> Result<Vec<Season>, CatalogError> {
        Err(CatalogError::FetchFailed {
            series_id: series_id.to_string(),
            reason: "metadata service returned 503".to_string(),
        })
    }
}

/// Clipboard sink with a fixed outcome per tier and a log of every attempt.
#[derive(Debug, Default)]
pub struct ScriptedClipboard {
    secure_works: bool,
    selectable_works: bool,
    notify_works: bool,
    persist_works: bool,
    log: Mutex<Vec<String>>,
}

impl ScriptedClipboard {
    pub fn new(
        secure_works: bool,
        selectable_works: bool,
        notify_works: bool,
        persist_works: bool,
    ) -> Self {
        Self {
            secure_works,
            selectable_works,
            notify_works,
            persist_works,
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn all_working() -> Self {
        Self::new(true, true, true, true)
    }

    /// Every attempted operation, as `kind:value`.
    pub fn log(&self) -> Vec<String> {
        self.log.lock().clone()
    }

    fn record(&self, entry: String, works: bool, what: &str) -> Result<(), String> {
        self.log.lock().push(entry);
        if works {
            Ok(())
        } else {
            Err(format!("{what} unavailable"))
        }
    }
}

impl ClipboardSink for ScriptedClipboard {
    fn write_secure(&self, value: &str) -> Result<(), String> {
        self.record(format!("secure:{value}"), self.secure_works, "secure clipboard")
    }

    fn write_selectable(&self, value: &str) -> Result<(), String> {
        self.record(
            format!("selectable:{value}"),
            self.selectable_works,
            "selection copy",
        )
    }

    fn notify(&self, _title: &str, message: &str) -> Result<(), String> {
        self.record(format!("notify:{message}"), self.notify_works, "notifications")
    }

    fn persist(&self, key: &str, value: &str) -> Result<(), String> {
        self.record(
            format!("persist:{key}={value}"),
            self.persist_works,
            "shared storage",
        )
    }
}
