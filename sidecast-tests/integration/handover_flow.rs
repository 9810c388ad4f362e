//! Handing a listed stream over to a device.

use std::sync::Arc;
use std::time::Duration;

use sidecast_core::SidecastConfig;
use sidecast_core::handover::{
    DispatchMethod, FormatHint, HandoverDialog, HandoverDispatcher, HandoverError,
    HandoverRequest, PlaybackMethod, UNSUPPORTED_FORMAT_WARNING,
};
use sidecast_core::test_mocks::{RecordingPlayer, ScriptedClipboard};
use sidecast_streams::{ParsedStream, StreamListService, StreamQuery};

use crate::common::JsonAddon;

async fn listed_streams() -> Vec<ParsedStream> {
    StreamListService::new(Arc::new(JsonAddon))
        .list_streams(&StreamQuery::episode("tt0903747", 1, 3))
        .await
        .unwrap()
}

fn request_for(stream: &ParsedStream) -> HandoverRequest {
    let url = stream.descriptor.url.clone().unwrap_or_default();
    HandoverRequest::new(url).with_format_hint(FormatHint::new(stream.format))
}

fn dialog(player: Arc<RecordingPlayer>, config: &SidecastConfig) -> HandoverDialog {
    HandoverDialog::new(
        HandoverDispatcher::new(player, config.handover.clone()),
        &config.ui,
    )
}

#[tokio::test]
async fn test_auto_handover_per_stream() {
    let config = SidecastConfig::for_testing();
    let player = Arc::new(RecordingPlayer::new());
    let dialog = dialog(player.clone(), &config);
    let streams = listed_streams().await;

    // MKV on a device with a player app goes through the deep link
    let outcome = dialog.dispatch(&request_for(&streams[0])).await.unwrap();
    assert_eq!(outcome.dispatched_method, DispatchMethod::Vlc);
    assert_eq!(outcome.warning, None);

    // MP4 streams natively
    let outcome = dialog.dispatch(&request_for(&streams[1])).await.unwrap();
    assert_eq!(outcome.dispatched_method, DispatchMethod::Airplay);

    let calls = player.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0].playback_url,
        "vlc-x-callback://x-callback-url/stream?url=https%3A%2F%2Fdebrid.example.com%2Fdl%2Fabc%2FShow.S01E03.2160p.mkv"
    );
    assert_eq!(
        calls[1].playback_url,
        "https://cdn.example.com/show/s01e03.mp4?token=xyz"
    );
    assert!(calls.iter().all(|call| call.device_id == "living-room"));
}

#[tokio::test]
async fn test_subtitles_and_missing_player_app() {
    let config = SidecastConfig::for_testing();
    let player = Arc::new(RecordingPlayer::new());
    let dialog = dialog(player.clone(), &config);
    let streams = listed_streams().await;

    let with_subtitles = HandoverRequest::new(streams[1].descriptor.url.clone().unwrap_or_default())
        .with_format_hint(FormatHint::new(streams[1].format).with_subtitles(true));
    let outcome = dialog.dispatch(&with_subtitles).await.unwrap();
    assert_eq!(outcome.dispatched_method, DispatchMethod::Vlc);

    let to_bedroom = request_for(&streams[0]).with_device("bedroom");
    let outcome = dialog.dispatch(&to_bedroom).await.unwrap();
    assert_eq!(outcome.device_id, "bedroom");
    assert_eq!(outcome.dispatched_method, DispatchMethod::Airplay);
    assert_eq!(outcome.warning.as_deref(), Some(UNSUPPORTED_FORMAT_WARNING));
}

#[tokio::test]
async fn test_explicit_method_is_honored() {
    let config = SidecastConfig::for_testing();
    let player = Arc::new(RecordingPlayer::new());
    let dialog = dialog(player.clone(), &config);
    let streams = listed_streams().await;

    let request = request_for(&streams[0])
        .with_device("bedroom")
        .with_method(PlaybackMethod::Vlc);
    let outcome = dialog.dispatch(&request).await.unwrap();

    assert_eq!(outcome.dispatched_method, DispatchMethod::Vlc);
    assert_eq!(player.calls()[0].method, DispatchMethod::Vlc);
}

#[tokio::test]
async fn test_no_device_makes_no_call() {
    let mut config = SidecastConfig::for_testing();
    config.handover.default_device_id = Some("unavailable".to_string());
    let player = Arc::new(RecordingPlayer::new());
    let dialog = dialog(player.clone(), &config);
    let streams = listed_streams().await;

    let result = dialog.dispatch(&request_for(&streams[1])).await;

    assert!(matches!(result, Err(HandoverError::DeviceUnavailable { .. })));
    assert_eq!(player.call_count(), 0);
}

#[tokio::test]
async fn test_player_failure_is_reported_once() {
    let config = SidecastConfig::for_testing();
    let player = Arc::new(RecordingPlayer::failing("device asleep"));
    let dialog = dialog(player.clone(), &config);
    let streams = listed_streams().await;

    let result = dialog.dispatch(&request_for(&streams[1])).await;

    match result {
        Err(HandoverError::DispatchFailed { device_id, reason }) => {
            assert_eq!(device_id, "living-room");
            assert_eq!(reason, "device asleep");
        }
        other => panic!("expected dispatch failure, got {other:?}"),
    }
    assert_eq!(player.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_copy_falls_back_to_notification() {
    let config = SidecastConfig::for_testing();
    let mut dialog = dialog(Arc::new(RecordingPlayer::new()), &config);
    let streams = listed_streams().await;
    let url = streams[2].descriptor.url.clone().unwrap_or_default();

    let sink = ScriptedClipboard::new(false, false, true, false);
    let success = dialog.copy_url(&sink, 2, &url).unwrap();

    assert_eq!(success.succeeded_at, 2);
    assert_eq!(dialog.copied_index(), Some(2));
    assert_eq!(
        sink.log(),
        vec![
            format!("secure:{url}"),
            format!("selectable:{url}"),
            format!("notify:{url}"),
            format!("persist:sidecast_last_copied_url={url}"),
        ]
    );

    tokio::time::sleep(Duration::from_millis(config.ui.copied_timeout_ms + 1)).await;
    assert_eq!(dialog.copied_index(), None);
}
