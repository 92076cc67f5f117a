use std::time::Duration;
use tracing::trace;

/// Which delayed action a timer belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    OverlayHide,
    VolumeIndicatorHide,
    BrightnessIndicatorHide,
    PositionPoll,
}

/// Identifies one scheduled firing.
///
/// Generations are never reused by a scheduler, so a handle that no longer
/// matches its owner's pending slot is stale and its firing is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    pub kind: TimerKind,
    pub generation: u64,
}

/// One-shot delayed actions. Firings are delivered back to the controls as
/// [`TimerHandle`]s on the same sequence that delivers input.
pub trait TimerScheduler: Send {
    fn schedule(&mut self, kind: TimerKind, delay: Duration) -> TimerHandle;
    fn cancel(&mut self, handle: TimerHandle);
    fn cancel_all(&mut self);
}

/// Holds at most one pending timer for its owner.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PendingTimer {
    handle: Option<TimerHandle>,
}

impl PendingTimer {
    /// Cancel whatever is pending, then schedule a replacement
    pub fn reschedule(
        &mut self,
        timers: &mut dyn TimerScheduler,
        kind: TimerKind,
        delay: Duration,
    ) -> TimerHandle {
        self.cancel(timers);
        let handle = timers.schedule(kind, delay);
        self.handle = Some(handle);
        handle
    }

    pub fn cancel(&mut self, timers: &mut dyn TimerScheduler) {
        if let Some(handle) = self.handle.take() {
            timers.cancel(handle);
        }
    }

    /// Claim a firing. Returns false for anything but the pending handle.
    pub fn fire(&mut self, handle: TimerHandle) -> bool {
        if self.handle == Some(handle) {
            self.handle = None;
            true
        } else {
            trace!("Dropping stale timer fire {:?}", handle);
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handle(&self) -> Option<TimerHandle> {
        self.handle
    }
}

#[derive(Debug, Clone, Copy)]
struct ManualEntry {
    deadline: Duration,
    handle: TimerHandle,
}

/// Scheduler driven by an external clock.
///
/// Hosts with their own frame clock advance it each frame; tests use it to
/// step through time deterministically.
#[derive(Debug, Default)]
pub struct ManualTimers {
    now: Duration,
    next_generation: u64,
    pending: Vec<ManualEntry>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the virtual clock
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn pending_of(&self, kind: TimerKind) -> usize {
        self.pending.iter().filter(|e| e.handle.kind == kind).count()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|e| e.handle == handle)
    }

    /// Remove and return the earliest timer due at or before `until`,
    /// moving the clock to its deadline. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerHandle> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= until)
            .min_by_key(|(_, e)| (e.deadline, e.handle.generation))
            .map(|(i, _)| i)?;

        let entry = self.pending.remove(index);
        self.now = self.now.max(entry.deadline);
        Some(entry.handle)
    }

    /// Move the clock forward without firing anything
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance by `delta` and return everything that came due, in order
    pub fn advance(&mut self, delta: Duration) -> Vec<TimerHandle> {
        let until = self.now + delta;
        let mut fired = Vec::new();
        while let Some(handle) = self.pop_due(until) {
            fired.push(handle);
        }
        self.now = until;
        fired
    }
}

impl TimerScheduler for ManualTimers {
    fn schedule(&mut self, kind: TimerKind, delay: Duration) -> TimerHandle {
        self.next_generation += 1;
        let handle = TimerHandle {
            kind,
            generation: self.next_generation,
        };
        self.pending.push(ManualEntry {
            deadline: self.now + delay,
            handle,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|e| e.handle != handle);
    }

    fn cancel_all(&mut self) {
        self.pending.clear();
    }
}
