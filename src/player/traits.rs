use std::time::Duration;

use crate::player::telemetry::PlaybackTelemetry;
use crate::utils::Result;

/// Coarse playback state as reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Buffering,
    Ready,
    Ended,
}

/// Why the engine is holding playback even though it was asked to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuppressionReason {
    #[default]
    None,
    TransientAudioFocusLoss,
    UnsuitableAudioOutput,
    Other,
}

/// Operations the engine may currently permit or refuse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    PlayPause,
    Prepare,
    SeekInCurrentMedia,
    SetSpeed,
    GetVolume,
    SetVolume,
    Stop,
}

impl Command {
    const ALL: [Command; 7] = [
        Command::PlayPause,
        Command::Prepare,
        Command::SeekInCurrentMedia,
        Command::SetSpeed,
        Command::GetVolume,
        Command::SetVolume,
        Command::Stop,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Set of commands the engine currently allows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Commands(u8);

impl Commands {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Command::ALL.into_iter().collect()
    }

    pub fn contains(&self, command: Command) -> bool {
        self.0 & command.bit() != 0
    }

    pub fn with(mut self, command: Command) -> Self {
        self.0 |= command.bit();
        self
    }

    pub fn without(mut self, command: Command) -> Self {
        self.0 &= !command.bit();
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = Command> + '_ {
        Command::ALL.into_iter().filter(|c| self.contains(*c))
    }
}

impl FromIterator<Command> for Commands {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        iter.into_iter().fold(Commands::empty(), Commands::with)
    }
}

/// A single engine listener callback, delivered as one tagged value.
///
/// The engine must marshal these onto the sequence that drives the
/// controls; the adapter folds each one into a fresh telemetry snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    PlaybackStateChanged(PlaybackState),
    PlayWhenReadyChanged(bool),
    SuppressionReasonChanged(SuppressionReason),
    AvailableCommandsChanged(Commands),
    VolumeChanged(f32),
}

/// The opaque media engine. Decoding and rendering happen behind this trait.
///
/// Every call is expected to be cheap and non-blocking. Command gating is the
/// adapter's job; implementations may assume the command is permitted.
pub trait PlaybackEngine: Send {
    fn set_source(&mut self, url: &str) -> Result<()>;
    fn prepare(&mut self) -> Result<()>;
    fn set_play_when_ready(&mut self, play_when_ready: bool) -> Result<()>;
    fn seek_to(&mut self, position: Duration) -> Result<()>;
    fn set_volume(&mut self, volume: f32) -> Result<()>;
    fn set_playback_rate(&mut self, rate: f32) -> Result<()>;
    fn position(&self) -> Duration;
    /// `None` while the duration is not yet known (live or still loading)
    fn duration(&self) -> Option<Duration>;
    fn buffered_position(&self) -> Duration;
    /// Current state, used to seed the adapter before any event arrives
    fn telemetry(&self) -> PlaybackTelemetry;
    fn release(&mut self);
}
