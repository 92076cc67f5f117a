//! The tokio runtime driving the controls with real (paused) time.

use std::time::Duration;

use touchplay::ControlsError;
use touchplay::models::EpisodeList;
use touchplay::player::EngineEvent;

use crate::common::{MockCall, spawn_runtime};

#[tokio::test(start_paused = true)]
async fn test_overlay_shown_on_start_and_hidden_by_tap() {
    let (handle, _engine, _window) = spawn_runtime();
    assert!(handle.snapshot().await.unwrap().overlay_visible);

    handle.tap().unwrap();
    assert!(!handle.snapshot().await.unwrap().overlay_visible);

    // The cancelled countdown must not resurface
    tokio::time::sleep(Duration::from_secs(6)).await;
    handle.tap().unwrap();
    let snapshot = handle.snapshot().await.unwrap();
    assert!(snapshot.overlay_visible);
}

#[tokio::test(start_paused = true)]
async fn test_position_poll_updates_display() {
    let (handle, engine, _window) = spawn_runtime();
    handle.snapshot().await.unwrap();

    engine.set_position(Duration::from_secs(25));
    engine.set_buffered(Duration::from_secs(40));
    tokio::time::sleep(Duration::from_millis(1_100)).await;

    let snapshot = handle.snapshot().await.unwrap();
    assert!((snapshot.displayed_percent - 0.25).abs() < 1e-4);
    assert!((snapshot.buffered_percent - 0.4).abs() < 1e-4);
}

#[tokio::test(start_paused = true)]
async fn test_scrub_survives_engine_updates() {
    let (handle, engine, _window) = spawn_runtime();
    handle.drag_start(500.0, 500.0).unwrap();
    handle.drag(200.0, 0.0).unwrap();
    // Queued drag is applied before the engine moves
    assert!(handle.snapshot().await.unwrap().is_scrubbing);

    engine.set_position(Duration::from_secs(70));
    handle
        .engine_event(EngineEvent::PlayWhenReadyChanged(true))
        .unwrap();
    tokio::time::sleep(Duration::from_secs(3)).await;

    let snapshot = handle.snapshot().await.unwrap();
    assert!(snapshot.is_scrubbing);
    assert!((snapshot.displayed_percent - 0.2).abs() < 1e-4);

    handle.drag_stop().unwrap();
    let snapshot = handle.snapshot().await.unwrap();
    assert!(!snapshot.is_scrubbing);
    assert_eq!(engine.seeks().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_volume_indicator_flashes_for_half_a_second() {
    let (handle, engine, _window) = spawn_runtime();
    handle.drag_start(800.0, 500.0).unwrap();
    handle.drag(0.0, -100.0).unwrap();
    handle.drag(0.0, 200.0).unwrap();
    handle.drag_stop().unwrap();

    let snapshot = handle.snapshot().await.unwrap();
    assert!(snapshot.volume_indicator.is_shown);
    assert!((snapshot.volume_indicator.value - 0.8).abs() < 1e-4);
    assert!(matches!(engine.calls().last(), Some(MockCall::SetVolume(_))));

    tokio::time::sleep(Duration::from_millis(450)).await;
    assert!(handle.snapshot().await.unwrap().volume_indicator.is_shown);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!handle.snapshot().await.unwrap().volume_indicator.is_shown);
}

#[tokio::test(start_paused = true)]
async fn test_episode_commands() {
    let (handle, engine, _window) = spawn_runtime();
    handle
        .load_episodes(EpisodeList::parse("A$https://a.example/1.mp4#B$https://a.example/2.mp4").unwrap())
        .unwrap();

    assert!(handle.play_next_episode().await.unwrap());
    assert!(engine
        .calls()
        .contains(&MockCall::SetSource("https://a.example/1.mp4".to_string())));

    handle.play_episode(1).await.unwrap();
    assert!(!handle.play_next_episode().await.unwrap());
    assert!(matches!(
        handle.play_episode(9).await,
        Err(ControlsError::EpisodeOutOfRange { index: 9, len: 2 })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_fullscreen_restored_on_shutdown() {
    let (handle, engine, window) = spawn_runtime();
    handle.toggle_fullscreen().unwrap();
    assert!(handle.snapshot().await.unwrap().is_fullscreen);
    assert!(window.bars_hidden());

    handle.shutdown().await.unwrap();
    assert!(!window.bars_hidden());
    assert_eq!(engine.calls().last(), Some(&MockCall::Release));

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(matches!(handle.drag_stop(), Err(ControlsError::RuntimeClosed)));
    assert_eq!(
        engine.calls().iter().filter(|c| **c == MockCall::Release).count(),
        1
    );
}

#[tokio::test(start_paused = true)]
async fn test_dropping_every_handle_stops_runtime() {
    let (handle, engine, _window) = spawn_runtime();
    let mut updates = handle.subscribe();
    handle.snapshot().await.unwrap();
    drop(handle);

    // Teardown publishes a hidden overlay before the runtime goes away
    loop {
        if !updates.borrow_and_update().overlay_visible {
            break;
        }
        if updates.changed().await.is_err() {
            break;
        }
    }
    tokio::task::yield_now().await;
    assert_eq!(engine.calls().last(), Some(&MockCall::Release));
}
