use std::time::Duration;
use tracing::debug;

use super::timer::{PendingTimer, TimerHandle, TimerKind, TimerScheduler};

/// Visibility of the transport overlay.
///
/// Every request cancels the pending hide before doing anything else, so at
/// most one hide timer is ever outstanding. While locked the overlay never
/// hides itself; only [`OverlayVisibility::request_hide`] clears the lock.
#[derive(Debug, Clone)]
pub struct OverlayVisibility {
    visible: bool,
    locked_visible: bool,
    pending_hide: PendingTimer,
    hide_delay: Duration,
}

impl OverlayVisibility {
    pub fn new(hide_delay: Duration) -> Self {
        Self {
            visible: false,
            locked_visible: false,
            pending_hide: PendingTimer::default(),
            hide_delay,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_locked(&self) -> bool {
        self.locked_visible
    }

    pub fn has_pending_hide(&self) -> bool {
        self.pending_hide.is_pending()
    }

    pub fn request_show(&mut self, lock: bool, timers: &mut dyn TimerScheduler) {
        self.pending_hide.cancel(timers);
        self.visible = true;

        if lock || self.locked_visible {
            if !self.locked_visible {
                debug!("Overlay locked visible");
            }
            self.locked_visible = true;
            return;
        }

        self.pending_hide
            .reschedule(timers, TimerKind::OverlayHide, self.hide_delay);
    }

    pub fn request_hide(&mut self, after_delay: bool, timers: &mut dyn TimerScheduler) {
        self.pending_hide.cancel(timers);
        self.locked_visible = false;

        if after_delay {
            self.pending_hide
                .reschedule(timers, TimerKind::OverlayHide, self.hide_delay);
        } else {
            self.visible = false;
        }
    }

    /// Tap on the playback surface
    pub fn toggle(&mut self, timers: &mut dyn TimerScheduler) {
        if self.visible {
            self.request_hide(false, timers);
        } else {
            self.request_show(false, timers);
        }
    }

    /// Restart the countdown if the overlay is up and not locked
    pub fn extend(&mut self, timers: &mut dyn TimerScheduler) {
        if self.visible && !self.locked_visible {
            self.request_show(false, timers);
        }
    }

    /// Returns true when the firing hid the overlay
    pub fn on_timer(&mut self, handle: TimerHandle) -> bool {
        if !self.pending_hide.fire(handle) {
            return false;
        }
        if self.locked_visible {
            return false;
        }
        debug!("Overlay auto-hidden after inactivity");
        self.visible = false;
        true
    }

    pub fn reset(&mut self, timers: &mut dyn TimerScheduler) {
        self.pending_hide.cancel(timers);
        self.visible = false;
        self.locked_visible = false;
    }
}
