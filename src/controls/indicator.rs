use serde::Serialize;
use std::time::Duration;
use tracing::trace;

use super::timer::{PendingTimer, TimerHandle, TimerKind, TimerScheduler};
use crate::utils::clamp_unit;

/// Short-lived HUD showing a level while it is being changed.
///
/// Each instance owns its own hide timer, so flashing the volume HUD never
/// touches the brightness HUD's countdown.
#[derive(Debug, Clone)]
pub struct TransientIndicator {
    kind: TimerKind,
    is_shown: bool,
    value: f32,
    pending_hide: PendingTimer,
    hide_delay: Duration,
}

impl TransientIndicator {
    pub fn volume(hide_delay: Duration) -> Self {
        Self::new(TimerKind::VolumeIndicatorHide, hide_delay)
    }

    pub fn brightness(hide_delay: Duration) -> Self {
        Self::new(TimerKind::BrightnessIndicatorHide, hide_delay)
    }

    fn new(kind: TimerKind, hide_delay: Duration) -> Self {
        Self {
            kind,
            is_shown: false,
            value: 0.0,
            pending_hide: PendingTimer::default(),
            hide_delay,
        }
    }

    pub fn is_shown(&self) -> bool {
        self.is_shown
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Show `value` and restart this indicator's hide countdown
    pub fn show(&mut self, value: f32, timers: &mut dyn TimerScheduler) {
        self.pending_hide.cancel(timers);
        self.is_shown = true;
        self.value = clamp_unit(value);
        self.pending_hide
            .reschedule(timers, self.kind, self.hide_delay);
    }

    pub fn on_timer(&mut self, handle: TimerHandle) -> bool {
        if handle.kind != self.kind || !self.pending_hide.fire(handle) {
            return false;
        }
        trace!("{:?} elapsed", self.kind);
        self.is_shown = false;
        true
    }

    pub fn reset(&mut self, timers: &mut dyn TimerScheduler) {
        self.pending_hide.cancel(timers);
        self.is_shown = false;
    }

    pub fn snapshot(&self) -> IndicatorSnapshot {
        IndicatorSnapshot {
            is_shown: self.is_shown,
            value: self.value,
        }
    }
}

/// Rendered state of one indicator
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct IndicatorSnapshot {
    pub is_shown: bool,
    pub value: f32,
}

/// Maps vertical drag distance to a level in [0, 1].
///
/// Dragging up (negative dy) raises the level; a drag across the full axis
/// length moves it by 1.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LevelAdjuster {
    value: f32,
}

impl LevelAdjuster {
    /// Seed from the sink's current level at the start of a drag
    pub fn begin(&mut self, current: f32) {
        self.value = clamp_unit(current);
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn drag(&mut self, dy: f32, axis_length: u32) -> f32 {
        if axis_length == 0 {
            return self.value;
        }
        self.value = clamp_unit(self.value - dy / axis_length as f32);
        self.value
    }
}
