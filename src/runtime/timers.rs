use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::controls::{TimerHandle, TimerKind, TimerScheduler};

/// Timers backed by tokio tasks.
///
/// Each timer is a spawned `sleep` that posts its handle back to the
/// runtime. Cancelling aborts the task; a firing that slips through before
/// the abort is rejected by its owner's generation check. Must be used from
/// inside a tokio runtime.
#[derive(Debug)]
pub struct TokioTimers {
    fired: mpsc::UnboundedSender<TimerHandle>,
    tasks: HashMap<TimerHandle, JoinHandle<()>>,
    next_generation: u64,
}

impl TokioTimers {
    pub fn new(fired: mpsc::UnboundedSender<TimerHandle>) -> Self {
        Self {
            fired,
            tasks: HashMap::new(),
            next_generation: 0,
        }
    }

    /// Timers scheduled and not yet finished or cancelled
    pub fn active(&self) -> usize {
        self.tasks.values().filter(|task| !task.is_finished()).count()
    }
}

impl TimerScheduler for TokioTimers {
    fn schedule(&mut self, kind: TimerKind, delay: Duration) -> TimerHandle {
        self.tasks.retain(|_, task| !task.is_finished());

        self.next_generation += 1;
        let handle = TimerHandle {
            kind,
            generation: self.next_generation,
        };

        let fired = self.fired.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Runtime gone means nobody is left to care
            let _ = fired.send(handle);
        });
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            trace!("Cancelling {:?}", handle);
            task.abort();
        }
    }

    fn cancel_all(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

impl Drop for TokioTimers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
