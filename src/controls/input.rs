use std::time::Duration;

use super::timer::TimerHandle;
use crate::player::EngineEvent;

/// Everything that can happen to the controls, delivered on one sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlInput {
    // Pointer
    Tap,
    DoubleTap,
    DragStart { x: f32, y: f32 },
    Drag { dx: f32, dy: f32 },
    DragStop,
    DragCancel,
    ProgressBarTap { x: f32, bar_width: u32 },
    Resize { width: u32, height: u32 },

    // Engine and clock
    Engine(EngineEvent),
    PositionTick,
    TimerFired(TimerHandle),

    // Transport buttons
    Play,
    Pause,
    TogglePlayPause,
    SeekTo(Duration),
    SetPlaybackRate(f32),
    ToggleFullscreen,

    Teardown,
}
