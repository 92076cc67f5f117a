use serde::Serialize;

use super::traits::{Command, Commands, EngineEvent, PlaybackState, SuppressionReason};
use crate::utils::clamp_unit;

/// Snapshot of everything the engine pushes about itself.
///
/// Replaced wholesale on every engine callback; nothing outside the adapter
/// mutates it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackTelemetry {
    pub playback_state: PlaybackState,
    pub play_when_ready: bool,
    pub suppression_reason: SuppressionReason,
    pub available_commands: Commands,
    pub volume: f32,
}

impl Default for PlaybackTelemetry {
    fn default() -> Self {
        Self {
            playback_state: PlaybackState::Idle,
            play_when_ready: false,
            suppression_reason: SuppressionReason::None,
            available_commands: Commands::empty(),
            volume: 1.0,
        }
    }
}

impl PlaybackTelemetry {
    /// Produce the snapshot that follows `event`
    pub fn apply(&self, event: EngineEvent) -> Self {
        let mut next = *self;
        match event {
            EngineEvent::PlaybackStateChanged(state) => next.playback_state = state,
            EngineEvent::PlayWhenReadyChanged(play) => next.play_when_ready = play,
            EngineEvent::SuppressionReasonChanged(reason) => next.suppression_reason = reason,
            EngineEvent::AvailableCommandsChanged(commands) => next.available_commands = commands,
            EngineEvent::VolumeChanged(volume) => next.volume = clamp_unit(volume),
        }
        next
    }

    pub fn is_playing(&self) -> bool {
        self.play_when_ready
            && !matches!(self.playback_state, PlaybackState::Idle | PlaybackState::Ended)
            && self.suppression_reason == SuppressionReason::None
    }

    pub fn is_buffering(&self) -> bool {
        self.playback_state == PlaybackState::Buffering
    }

    pub fn should_show_play_button(&self) -> bool {
        self.available_commands.contains(Command::PlayPause)
    }

    pub fn can(&self, command: Command) -> bool {
        self.available_commands.contains(command)
    }

    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            is_playing: self.is_playing(),
            is_buffering: self.is_buffering(),
            should_show_play_button: self.should_show_play_button(),
        }
    }
}

/// Derived flags the UI layer renders from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PlaybackStatus {
    pub is_playing: bool,
    pub is_buffering: bool,
    pub should_show_play_button: bool,
}
