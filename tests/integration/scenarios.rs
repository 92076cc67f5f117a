//! End-to-end behaviour of the control surface on a virtual clock.

use std::time::Duration;

use touchplay::controls::{BrightnessOverride, ControlInput, TimerKind};
use touchplay::models::EpisodeList;
use touchplay::player::{Command, Commands, EngineEvent};
use touchplay::{ControlsConfig, ControlsError};

use crate::common::{MockCall, TestPlayer};

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn test_each_locked_drag_feeds_exactly_one_consumer() {
    // (origin x, first delta) and the consumer that must react
    let cases = [
        (500.0, (20.0, 5.0), "seek"),
        (300.0, (5.0, 20.0), "brightness"),
        (700.0, (5.0, 20.0), "volume"),
        (500.0, (10.0, 10.0), "seek"),
    ];

    for (x, (dx, dy), expected) in cases {
        let mut player = TestPlayer::new();
        player.controls.on_drag_start(x, 500.0);
        player.controls.on_drag(dx, dy);
        // Follow-up deltas on the other axis must not leak
        player.controls.on_drag(dy * 3.0, dx * 3.0);

        let snapshot = player.controls.snapshot();
        let fed = [
            ("seek", snapshot.is_scrubbing),
            ("brightness", snapshot.brightness_indicator.is_shown),
            ("volume", snapshot.volume_indicator.is_shown),
        ];
        let active: Vec<_> = fed.iter().filter(|(_, on)| *on).map(|(name, _)| *name).collect();
        assert_eq!(active, vec![expected], "origin x {} delta ({}, {})", x, dx, dy);
    }
}

#[test]
fn test_edge_margin_drags_feed_nobody() {
    let mut config = ControlsConfig::default();
    config.gesture.density = 2.0;
    let mut player = TestPlayer::with_config(config);

    // 48 px margin at density 2
    for (x, y) in [(40.0, 500.0), (960.0, 500.0), (500.0, 40.0), (500.0, 960.0)] {
        player.controls.on_drag_start(x, y);
        player.controls.on_drag(30.0, 0.0);
        player.controls.on_drag(0.0, 30.0);
        player.controls.on_drag_stop();
    }

    let snapshot = player.controls.snapshot();
    assert!(!snapshot.is_scrubbing);
    assert!(!snapshot.volume_indicator.is_shown);
    assert!(!snapshot.brightness_indicator.is_shown);
    assert!(player.engine.calls().is_empty());
    assert_eq!(player.window.brightness(), BrightnessOverride::SystemDefault);
}

#[test]
fn test_scrub_round_trip_seeks_at_most_once() {
    // Far enough: one seek to the release point
    let mut player = TestPlayer::new();
    player.engine.set_position(Duration::from_secs(30));
    player.controls.on_position_tick();
    player.controls.on_drag_start(500.0, 500.0);
    for _ in 0..5 {
        player.controls.on_drag(40.0, 2.0);
    }
    player.controls.on_drag_stop();

    let seeks = player.engine.seeks();
    assert_eq!(seeks.len(), 1);
    assert!((seeks[0].as_secs_f32() - 50.0).abs() < 0.01);

    // Out and back again: no seek at all
    let mut player = TestPlayer::new();
    player.engine.set_position(Duration::from_secs(30));
    player.controls.on_position_tick();
    player.controls.on_drag_start(500.0, 500.0);
    player.controls.on_drag(150.0, 0.0);
    player.controls.on_drag(-146.0, 0.0);
    player.controls.on_drag_stop();

    assert!(player.engine.seeks().is_empty());
    assert!(approx(player.controls.snapshot().displayed_percent, 0.3));
}

#[test]
fn test_center_drag_scenario() {
    let mut player = TestPlayer::new();
    player.engine.set_position(Duration::from_secs(10));
    player.controls.on_position_tick();
    let before = player.controls.snapshot().displayed_percent;

    player.controls.on_drag_start(500.0, 500.0);
    player.controls.on_drag(20.0, 5.0);

    let after = player.controls.snapshot();
    assert!(after.is_scrubbing);
    assert!(approx(after.displayed_percent - before, 0.02));
}

#[test]
fn test_left_vertical_drag_scenario() {
    let mut player = TestPlayer::new();
    player.controls.on_drag_start(300.0, 500.0);
    player.controls.on_drag(5.0, 20.0);

    let snapshot = player.controls.snapshot();
    assert!(snapshot.brightness_indicator.is_shown);
    assert!(approx(snapshot.brightness_indicator.value, 0.48));
    match player.window.brightness() {
        BrightnessOverride::Level(level) => assert!(approx(level, 0.48)),
        other => panic!("brightness not overridden: {:?}", other),
    }
}

#[test]
fn test_lock_then_unlock_hides_after_exactly_five_seconds() {
    let mut player = TestPlayer::new();
    player.controls.on_drag_start(500.0, 500.0);
    player.controls.on_drag(50.0, 0.0);
    assert!(player.controls.snapshot().locked_visible);

    player.controls.advance(Duration::from_secs(10));
    assert!(player.controls.snapshot().overlay_visible);

    player.controls.on_drag_stop();
    player.controls.advance(Duration::from_millis(4_999));
    assert!(player.controls.snapshot().overlay_visible);
    player.controls.advance(Duration::from_millis(1));
    assert!(!player.controls.snapshot().overlay_visible);
}

#[test]
fn test_repeated_taps_never_stack_hide_timers() {
    let mut player = TestPlayer::new();
    for _ in 0..7 {
        player.controls.handle(ControlInput::Tap);
        assert!(player.controls.timers().pending_of(TimerKind::OverlayHide) <= 1);
    }
    // Odd number of taps leaves it shown with one countdown
    assert!(player.controls.snapshot().overlay_visible);
    assert_eq!(player.controls.timers().pending_of(TimerKind::OverlayHide), 1);
}

#[test]
fn test_volume_and_brightness_timers_are_independent() {
    let mut player = TestPlayer::new();

    player.controls.on_drag_start(300.0, 500.0);
    player.controls.on_drag(0.0, -50.0);
    player.controls.on_drag_stop();

    player.controls.advance(Duration::from_millis(300));

    player.controls.on_drag_start(700.0, 500.0);
    player.controls.on_drag(0.0, 50.0);
    player.controls.on_drag_stop();

    player.controls.advance(Duration::from_millis(200));
    let snapshot = player.controls.snapshot();
    assert!(!snapshot.brightness_indicator.is_shown);
    assert!(snapshot.volume_indicator.is_shown);

    player.controls.advance(Duration::from_millis(300));
    assert!(!player.controls.snapshot().volume_indicator.is_shown);
}

#[test]
fn test_unavailable_commands_are_silent() {
    let mut player = TestPlayer::new();
    player
        .controls
        .on_engine_event(EngineEvent::AvailableCommandsChanged(Commands::empty()));

    player.controls.handle(ControlInput::Play);
    player.controls.handle(ControlInput::SeekTo(Duration::from_secs(3)));
    player.controls.handle(ControlInput::SetPlaybackRate(2.0));
    player.controls.on_progress_bar_tap(50.0, 100);

    assert!(player.engine.calls().is_empty());
    assert!(!player.controls.snapshot().should_show_play_button);
}

#[test]
fn test_transport_buttons_reach_engine() {
    let mut player = TestPlayer::new();
    player.controls.handle(ControlInput::TogglePlayPause);
    player.controls.handle(ControlInput::SeekTo(Duration::from_secs(250)));
    player.controls.handle(ControlInput::SetPlaybackRate(1.25));

    assert_eq!(
        player.engine.calls(),
        vec![
            MockCall::PlayWhenReady(true),
            MockCall::SeekTo(Duration::from_secs(100)),
            MockCall::SetPlaybackRate(1.25),
        ]
    );
    assert_eq!(player.controls.snapshot().displayed_percent, 1.0);
}

#[test]
fn test_engine_errors_are_swallowed() {
    let mut player = TestPlayer::new();
    player.engine.inject_error("surface lost");

    player.controls.handle(ControlInput::Play);
    player.controls.on_progress_bar_tap(25.0, 100);
    assert_eq!(player.engine.calls().len(), 2);
    assert!(player.controls.is_live());

    let err = player
        .controls
        .prepare("https://cdn.example.com/a.m3u8")
        .unwrap_err();
    assert!(err.is_transient());
}

#[test]
fn test_disabled_seek_command_mid_scrub() {
    let mut player = TestPlayer::new();
    player.controls.on_drag_start(500.0, 500.0);
    player.controls.on_drag(300.0, 0.0);
    player.controls.on_engine_event(EngineEvent::AvailableCommandsChanged(
        Commands::all().without(Command::SeekInCurrentMedia),
    ));
    player.controls.on_drag_stop();

    assert!(player.engine.seeks().is_empty());
    assert!(approx(player.controls.snapshot().displayed_percent, 0.0));
}

#[test]
fn test_episode_playback_through_surface() {
    let mut player = TestPlayer::new();
    let episodes = EpisodeList::parse(
        "EP01$https://cdn.example.com/1.m3u8#EP02$https://cdn.example.com/2.m3u8",
    )
    .unwrap();
    player.controls.load_episodes(episodes);

    player.controls.play_episode(1).unwrap();
    assert_eq!(
        player.engine.calls()[..2],
        [
            MockCall::SetSource("https://cdn.example.com/2.m3u8".to_string()),
            MockCall::Prepare
        ]
    );
    assert!(!player.controls.play_next_episode().unwrap());

    let err = player.controls.play_episode(2).unwrap_err();
    assert_eq!(err, ControlsError::EpisodeOutOfRange { index: 2, len: 2 });
}

#[test]
fn test_teardown_then_stale_input() {
    let mut player = TestPlayer::new();
    player.controls.start();
    player.controls.handle(ControlInput::ToggleFullscreen);
    assert!(player.window.bars_hidden());

    player.controls.handle(ControlInput::Teardown);
    assert_eq!(player.engine.calls(), vec![MockCall::Release]);
    assert!(!player.window.bars_hidden());

    player.controls.advance(Duration::from_secs(30));
    player.controls.handle(ControlInput::DoubleTap);
    player.controls.on_drag_start(500.0, 500.0);
    player.controls.on_drag(100.0, 0.0);
    player.controls.on_drag_stop();

    assert_eq!(player.engine.calls(), vec![MockCall::Release]);
    let snapshot = player.controls.snapshot();
    assert!(!snapshot.overlay_visible);
    assert!(!snapshot.is_scrubbing);
}

#[test]
fn test_snapshot_exports_as_json() {
    let mut player = TestPlayer::new();
    player.controls.start();
    let json = player.controls.snapshot().to_json().unwrap();
    assert!(json.contains("\"overlay_visible\":true"));
    assert!(json.contains("\"brightness_indicator\""));
}
