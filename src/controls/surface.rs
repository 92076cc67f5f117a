use std::time::Duration;
use tracing::{debug, info, trace};

use super::gesture::{DragTarget, GestureDisambiguator};
use super::host::{BrightnessOverride, WindowHost};
use super::indicator::{LevelAdjuster, TransientIndicator};
use super::input::ControlInput;
use super::seek_bar::SeekBar;
use super::snapshot::OverlaySnapshot;
use super::timer::{ManualTimers, PendingTimer, TimerHandle, TimerKind, TimerScheduler};
use super::visibility::OverlayVisibility;
use crate::config::ControlsConfig;
use crate::constants::FALLBACK_BRIGHTNESS;
use crate::models::EpisodeList;
use crate::player::{EngineEvent, PlaybackAdapter, PlaybackEngine};
use crate::utils::Result;

/// The player screen's control state machine.
///
/// Owns the engine adapter, the window collaborator and every piece of
/// overlay state. All methods take `&mut self` and are expected to run on a
/// single sequence: pointer input, engine callbacks and timer firings are
/// all funnelled through [`PlayerControls::handle`] or the `on_*` methods.
///
/// After [`PlayerControls::teardown`] every entry point is a no-op.
pub struct PlayerControls<S: TimerScheduler> {
    config: ControlsConfig,
    adapter: PlaybackAdapter,
    window: Box<dyn WindowHost>,
    timers: S,

    gestures: GestureDisambiguator,
    overlay: OverlayVisibility,
    seek_bar: SeekBar,
    volume_indicator: TransientIndicator,
    brightness_indicator: TransientIndicator,
    volume_level: LevelAdjuster,
    brightness_level: LevelAdjuster,
    position_poll: PendingTimer,

    surface_width: u32,
    surface_height: u32,
    is_fullscreen: bool,
    episodes: EpisodeList,
    current_episode: Option<usize>,
    live: bool,
}

impl<S: TimerScheduler> std::fmt::Debug for PlayerControls<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerControls")
            .field("adapter", &self.adapter)
            .field("overlay", &self.overlay)
            .field("seek_bar", &self.seek_bar)
            .field("surface", &(self.surface_width, self.surface_height))
            .field("is_fullscreen", &self.is_fullscreen)
            .field("current_episode", &self.current_episode)
            .field("live", &self.live)
            .finish()
    }
}

impl<S: TimerScheduler> PlayerControls<S> {
    pub fn new(
        config: ControlsConfig,
        engine: Box<dyn PlaybackEngine>,
        window: Box<dyn WindowHost>,
        timers: S,
    ) -> Self {
        Self {
            gestures: GestureDisambiguator::new(config.edge_margin_px()),
            overlay: OverlayVisibility::new(config.overlay_hide_delay()),
            seek_bar: SeekBar::new(config.seek.epsilon),
            volume_indicator: TransientIndicator::volume(config.indicator_hide_delay()),
            brightness_indicator: TransientIndicator::brightness(config.indicator_hide_delay()),
            volume_level: LevelAdjuster::default(),
            brightness_level: LevelAdjuster::default(),
            position_poll: PendingTimer::default(),
            adapter: PlaybackAdapter::new(engine),
            window,
            timers,
            config,
            surface_width: 0,
            surface_height: 0,
            is_fullscreen: false,
            episodes: EpisodeList::default(),
            current_episode: None,
            live: true,
        }
    }

    /// Show the overlay for its first countdown and start polling position
    pub fn start(&mut self) {
        if !self.live {
            return;
        }
        debug!("Starting player controls");
        self.overlay.request_show(false, &mut self.timers);
        self.sync_position();
        self.restart_poll();
    }

    pub fn handle(&mut self, input: ControlInput) {
        if !self.live {
            trace!("Controls torn down, dropping {:?}", input);
            return;
        }

        match input {
            ControlInput::Tap => self.on_tap(),
            ControlInput::DoubleTap => self.on_double_tap(),
            ControlInput::DragStart { x, y } => self.on_drag_start(x, y),
            ControlInput::Drag { dx, dy } => self.on_drag(dx, dy),
            ControlInput::DragStop => self.on_drag_stop(),
            ControlInput::DragCancel => self.on_drag_cancel(),
            ControlInput::ProgressBarTap { x, bar_width } => self.on_progress_bar_tap(x, bar_width),
            ControlInput::Resize { width, height } => self.on_resize(width, height),
            ControlInput::Engine(event) => self.on_engine_event(event),
            ControlInput::PositionTick => self.on_position_tick(),
            ControlInput::TimerFired(handle) => self.on_timer(handle),
            ControlInput::Play => self.play(),
            ControlInput::Pause => self.pause(),
            ControlInput::TogglePlayPause => self.toggle_play_pause(),
            ControlInput::SeekTo(position) => self.seek_to(position),
            ControlInput::SetPlaybackRate(rate) => self.set_playback_rate(rate),
            ControlInput::ToggleFullscreen => self.toggle_fullscreen(),
            ControlInput::Teardown => self.teardown(),
        }
    }

    // === Pointer input ===

    pub fn on_tap(&mut self) {
        if !self.live {
            return;
        }
        self.overlay.toggle(&mut self.timers);
    }

    pub fn on_double_tap(&mut self) {
        if !self.live {
            return;
        }
        if self.adapter.telemetry().should_show_play_button() {
            self.adapter.toggle_play_pause();
            self.overlay.extend(&mut self.timers);
        }
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.surface_width = width;
        self.surface_height = height;
    }

    pub fn on_drag_start(&mut self, x: f32, y: f32) {
        if !self.live {
            return;
        }
        // A session whose stop never arrived is abandoned, not carried over
        if self.gestures.session().is_some() {
            debug!("Drag started over an unfinished session");
            self.on_drag_cancel();
        }
        self.gestures
            .drag_start(x, y, self.surface_width, self.surface_height);
    }

    pub fn on_drag(&mut self, dx: f32, dy: f32) {
        if !self.live {
            return;
        }
        let Some(routed) = self.gestures.drag_delta(dx, dy) else {
            return;
        };

        match routed.target {
            DragTarget::Seek => {
                if routed.locked_now {
                    self.begin_scrub();
                }
                self.seek_bar.scrub_by(routed.dx, routed.touchable_width);
            }
            DragTarget::Volume => {
                if routed.locked_now {
                    self.volume_level.begin(self.adapter.volume());
                    self.overlay.request_show(true, &mut self.timers);
                }
                let value = self.volume_level.drag(routed.dy, routed.touchable_height);
                if let Some(applied) = self.adapter.set_volume(value) {
                    self.volume_indicator.show(applied, &mut self.timers);
                }
            }
            DragTarget::Brightness => {
                if routed.locked_now {
                    let current = self.current_brightness();
                    self.brightness_level.begin(current);
                    self.overlay.request_show(true, &mut self.timers);
                }
                let value = self
                    .brightness_level
                    .drag(routed.dy, routed.touchable_height);
                self.window
                    .set_brightness_override(BrightnessOverride::Level(value));
                self.brightness_indicator.show(value, &mut self.timers);
            }
        }
    }

    pub fn on_drag_stop(&mut self) {
        if !self.live {
            return;
        }
        match self.gestures.drag_stop() {
            Some(DragTarget::Seek) => {
                let seeked = self
                    .seek_bar
                    .end_scrub()
                    .and_then(|percent| self.adapter.seek_to_percent(percent));
                if seeked.is_none() {
                    self.sync_position();
                }
                self.finish_scrub();
            }
            Some(DragTarget::Volume | DragTarget::Brightness) => {
                self.overlay.request_hide(true, &mut self.timers);
            }
            None => {}
        }
    }

    /// The platform abandoned the drag; nothing is committed
    pub fn on_drag_cancel(&mut self) {
        if !self.live {
            return;
        }
        match self.gestures.drag_cancel() {
            Some(DragTarget::Seek) => {
                self.seek_bar.cancel_scrub();
                self.sync_position();
                self.finish_scrub();
            }
            Some(DragTarget::Volume | DragTarget::Brightness) => {
                self.overlay.request_hide(true, &mut self.timers);
            }
            None => {}
        }
    }

    /// Direct tap on the progress bar: seek now, no scrub state
    pub fn on_progress_bar_tap(&mut self, x: f32, bar_width: u32) {
        if !self.live {
            return;
        }
        let Some(percent) = self.seek_bar.tap_to_seek(x, bar_width) else {
            return;
        };
        if self.adapter.seek_to_percent(percent).is_none() {
            self.sync_position();
        }
        self.overlay.request_show(false, &mut self.timers);
    }

    // === Engine and clock ===

    pub fn on_engine_event(&mut self, event: EngineEvent) {
        if !self.live {
            return;
        }
        let telemetry = self.adapter.apply_event(event);
        if let EngineEvent::VolumeChanged(_) = event {
            self.volume_indicator
                .show(telemetry.volume, &mut self.timers);
        }
        self.sync_position();
    }

    pub fn on_position_tick(&mut self) {
        if !self.live {
            return;
        }
        self.sync_position();
    }

    pub fn on_timer(&mut self, handle: TimerHandle) {
        if !self.live {
            trace!("Timer {:?} fired after teardown", handle);
            return;
        }

        match handle.kind {
            TimerKind::OverlayHide => {
                self.overlay.on_timer(handle);
            }
            TimerKind::VolumeIndicatorHide => {
                self.volume_indicator.on_timer(handle);
            }
            TimerKind::BrightnessIndicatorHide => {
                self.brightness_indicator.on_timer(handle);
            }
            TimerKind::PositionPoll => {
                if self.position_poll.fire(handle) {
                    self.sync_position();
                    self.restart_poll();
                }
            }
        }
    }

    // === Transport ===

    /// Load a new source. Clears any scrub and restarts the position poll.
    pub fn prepare(&mut self, url: &str) -> Result<()> {
        if !self.live {
            return Ok(());
        }
        self.adapter.prepare(url)?;
        self.seek_bar.reset();
        self.restart_poll();
        Ok(())
    }

    pub fn play(&mut self) {
        if self.live {
            self.adapter.play();
        }
    }

    pub fn pause(&mut self) {
        if self.live {
            self.adapter.pause();
        }
    }

    pub fn toggle_play_pause(&mut self) {
        if self.live {
            self.adapter.toggle_play_pause();
        }
    }

    pub fn seek_to(&mut self, position: Duration) {
        if !self.live || self.seek_bar.is_scrubbing() {
            return;
        }
        if self.adapter.seek_to(position).is_some() {
            self.sync_position();
        }
    }

    pub fn set_playback_rate(&mut self, rate: f32) {
        if self.live {
            self.adapter.set_playback_rate(rate);
        }
    }

    pub fn toggle_fullscreen(&mut self) {
        if !self.live {
            return;
        }
        self.is_fullscreen = !self.is_fullscreen;
        debug!("Fullscreen: {}", self.is_fullscreen);
        self.window.set_system_bars_hidden(self.is_fullscreen);
    }

    // === Episodes ===

    pub fn load_episodes(&mut self, episodes: EpisodeList) {
        debug!("Loaded {} episodes", episodes.len());
        self.episodes = episodes;
        self.current_episode = None;
    }

    pub fn episodes(&self) -> &EpisodeList {
        &self.episodes
    }

    pub fn current_episode(&self) -> Option<usize> {
        self.current_episode
    }

    /// Prepare and start the episode at `index`
    pub fn play_episode(&mut self, index: usize) -> Result<()> {
        if !self.live {
            return Ok(());
        }
        let url = self.episodes.get(index)?.url.clone();
        info!("Playing episode {} of {}", index + 1, self.episodes.len());
        self.prepare(&url)?;
        self.current_episode = Some(index);
        self.adapter.play();
        Ok(())
    }

    /// Advance to the following episode. Returns false at the end of the list.
    pub fn play_next_episode(&mut self) -> Result<bool> {
        let next = match self.current_episode {
            Some(index) if self.episodes.has_next(index) => index + 1,
            Some(_) => return Ok(false),
            None if !self.episodes.is_empty() => 0,
            None => return Ok(false),
        };
        self.play_episode(next)?;
        Ok(true)
    }

    // === Lifecycle ===

    /// Cancel every timer, reset overlay state and release the engine
    pub fn teardown(&mut self) {
        if !self.live {
            return;
        }
        info!("Tearing down player controls");

        self.timers.cancel_all();
        self.position_poll.cancel(&mut self.timers);
        self.overlay.reset(&mut self.timers);
        self.volume_indicator.reset(&mut self.timers);
        self.brightness_indicator.reset(&mut self.timers);
        self.gestures.drag_cancel();
        self.seek_bar.reset();
        self.adapter.release();

        if self.is_fullscreen {
            self.is_fullscreen = false;
            self.window.set_system_bars_hidden(false);
        }
        self.live = false;
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn snapshot(&self) -> OverlaySnapshot {
        let status = self.adapter.telemetry().status();
        OverlaySnapshot {
            overlay_visible: self.overlay.is_visible(),
            locked_visible: self.overlay.is_locked(),
            displayed_percent: self.seek_bar.displayed_percent(),
            buffered_percent: self.seek_bar.buffered_percent(),
            volume_indicator: self.volume_indicator.snapshot(),
            brightness_indicator: self.brightness_indicator.snapshot(),
            should_show_play_button: status.should_show_play_button,
            is_playing: status.is_playing,
            is_buffering: status.is_buffering,
            is_fullscreen: self.is_fullscreen,
            is_scrubbing: self.seek_bar.is_scrubbing(),
        }
    }

    pub fn adapter(&self) -> &PlaybackAdapter {
        &self.adapter
    }

    pub fn config(&self) -> &ControlsConfig {
        &self.config
    }

    pub fn timers(&self) -> &S {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut S {
        &mut self.timers
    }

    fn begin_scrub(&mut self) {
        self.seek_bar.begin_scrub();
        self.position_poll.cancel(&mut self.timers);
        self.overlay.request_show(true, &mut self.timers);
    }

    fn finish_scrub(&mut self) {
        self.overlay.request_hide(true, &mut self.timers);
        self.restart_poll();
    }

    fn restart_poll(&mut self) {
        if !self.live || self.seek_bar.is_scrubbing() {
            return;
        }
        self.position_poll.reschedule(
            &mut self.timers,
            TimerKind::PositionPoll,
            self.config.poll_interval(),
        );
    }

    fn sync_position(&mut self) {
        self.seek_bar
            .sync_from_engine(self.adapter.content_percent(), self.adapter.buffered_percent());
    }

    fn current_brightness(&self) -> f32 {
        match self.window.brightness_override() {
            BrightnessOverride::Level(value) => value,
            BrightnessOverride::SystemDefault => self
                .window
                .system_brightness()
                .unwrap_or(FALLBACK_BRIGHTNESS),
        }
    }
}

impl PlayerControls<ManualTimers> {
    /// Move the virtual clock forward, delivering every timer that comes
    /// due on the way, including ones scheduled by earlier firings.
    pub fn advance(&mut self, delta: Duration) {
        let until = self.timers.now() + delta;
        while let Some(handle) = self.timers.pop_due(until) {
            self.on_timer(handle);
        }
        self.timers.set_now(until);
    }
}
