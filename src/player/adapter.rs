use std::time::Duration;
use tracing::{debug, info, trace, warn};

use super::telemetry::PlaybackTelemetry;
use super::traits::{Command, EngineEvent, PlaybackEngine, PlaybackState};
use crate::utils::{ControlsError, Result, clamp_unit};

/// Wraps the engine and gates every mutating call on the commands the
/// engine currently reports as available.
///
/// An unavailable command is a silent no-op, and so is any call after
/// [`PlaybackAdapter::release`]. Engine failures on transport calls are
/// logged and swallowed; only [`PlaybackAdapter::prepare`] reports them.
pub struct PlaybackAdapter {
    engine: Box<dyn PlaybackEngine>,
    telemetry: PlaybackTelemetry,
    source: Option<String>,
    released: bool,
}

impl std::fmt::Debug for PlaybackAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackAdapter")
            .field("engine", &"<dyn PlaybackEngine>")
            .field("telemetry", &self.telemetry)
            .field("source", &self.source)
            .field("released", &self.released)
            .finish()
    }
}

impl PlaybackAdapter {
    pub fn new(engine: Box<dyn PlaybackEngine>) -> Self {
        let telemetry = engine.telemetry();
        Self {
            engine,
            telemetry,
            source: None,
            released: false,
        }
    }

    pub fn telemetry(&self) -> &PlaybackTelemetry {
        &self.telemetry
    }

    /// Fold an engine callback into a new snapshot and return it
    pub fn apply_event(&mut self, event: EngineEvent) -> PlaybackTelemetry {
        self.telemetry = self.telemetry.apply(event);
        trace!("Telemetry after {:?}: {:?}", event, self.telemetry);
        self.telemetry
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Load a new source and prepare it for playback
    pub fn prepare(&mut self, url: &str) -> Result<()> {
        if self.released {
            trace!("Ignoring prepare after release");
            return Ok(());
        }

        url::Url::parse(url).map_err(|e| ControlsError::InvalidSource {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        info!("Preparing source: {}", url);
        self.engine.set_source(url)?;
        self.engine.prepare()?;
        self.source = Some(url.to_string());
        Ok(())
    }

    pub fn play(&mut self) {
        if !self.permits(Command::PlayPause) || self.telemetry.is_playing() {
            return;
        }

        match self.telemetry.playback_state {
            PlaybackState::Idle if self.telemetry.can(Command::Prepare) => {
                debug!("Re-preparing idle engine before play");
                log_failure("prepare", self.engine.prepare());
            }
            PlaybackState::Ended if self.telemetry.can(Command::SeekInCurrentMedia) => {
                debug!("Restarting ended media from the beginning");
                log_failure("seek", self.engine.seek_to(Duration::ZERO));
            }
            _ => {}
        }

        log_failure("play", self.engine.set_play_when_ready(true));
    }

    pub fn pause(&mut self) {
        if !self.permits(Command::PlayPause) || !self.telemetry.is_playing() {
            return;
        }
        log_failure("pause", self.engine.set_play_when_ready(false));
    }

    pub fn toggle_play_pause(&mut self) {
        if self.telemetry.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Seek to an absolute position. Returns the position actually requested.
    pub fn seek_to(&mut self, position: Duration) -> Option<Duration> {
        if !self.permits(Command::SeekInCurrentMedia) {
            return None;
        }
        let Some(duration) = self.engine.duration() else {
            trace!("Seek ignored: duration unknown");
            return None;
        };

        let target = position.min(duration);
        debug!("Seeking to {:?} of {:?}", target, duration);
        log_failure("seek", self.engine.seek_to(target));
        Some(target)
    }

    /// Seek to `percent` of the known duration
    pub fn seek_to_percent(&mut self, percent: f32) -> Option<Duration> {
        let duration = self.engine.duration()?;
        self.seek_to(duration.mul_f32(clamp_unit(percent)))
    }

    pub fn set_playback_rate(&mut self, rate: f32) {
        if !self.permits(Command::SetSpeed) {
            return;
        }
        if !rate.is_finite() || rate <= 0.0 {
            warn!("Ignoring invalid playback rate {}", rate);
            return;
        }
        log_failure("set playback rate", self.engine.set_playback_rate(rate));
    }

    /// Apply a volume level. Returns the clamped value sent to the engine.
    pub fn set_volume(&mut self, volume: f32) -> Option<f32> {
        if !self.permits(Command::GetVolume) || !self.permits(Command::SetVolume) {
            return None;
        }
        let volume = clamp_unit(volume);
        log_failure("set volume", self.engine.set_volume(volume));
        Some(volume)
    }

    pub fn volume(&self) -> f32 {
        self.telemetry.volume
    }

    pub fn position(&self) -> Duration {
        self.engine.position()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.engine.duration()
    }

    /// Played fraction, 0 while idle/ended or when the duration is unknown
    pub fn content_percent(&self) -> f32 {
        self.fraction_of_duration(self.engine.position())
    }

    pub fn buffered_percent(&self) -> f32 {
        self.fraction_of_duration(self.engine.buffered_position())
    }

    /// Release the engine. Idempotent; later calls are no-ops.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        info!("Releasing playback engine");
        self.engine.release();
        self.released = true;
    }

    fn fraction_of_duration(&self, position: Duration) -> f32 {
        if matches!(
            self.telemetry.playback_state,
            PlaybackState::Idle | PlaybackState::Ended
        ) {
            return 0.0;
        }
        match self.engine.duration() {
            Some(duration) if !duration.is_zero() => {
                clamp_unit((position.as_secs_f64() / duration.as_secs_f64()) as f32)
            }
            _ => 0.0,
        }
    }

    fn permits(&self, command: Command) -> bool {
        if self.released {
            trace!("{:?} ignored: engine released", command);
            return false;
        }
        if !self.telemetry.can(command) {
            trace!("{:?} ignored: command unavailable", command);
            return false;
        }
        true
    }
}

fn log_failure(operation: &str, result: Result<()>) {
    if let Err(e) = result {
        warn!("Engine {} failed: {}", operation, e);
    }
}
