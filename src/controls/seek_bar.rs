use tracing::{debug, trace};

use crate::utils::clamp_unit;

/// Slack for f32 accumulation when comparing a scrub distance to epsilon
const EPSILON_SLACK: f32 = 1e-6;

/// What the progress bar renders.
///
/// While scrubbing, `displayed_percent` is driven by the drag alone and
/// engine updates are ignored for display. Otherwise it mirrors the engine
/// on every sync.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrubState {
    pub is_scrubbing: bool,
    pub displayed_percent: f32,
}

/// Reconciles user scrubs with the engine-reported position
#[derive(Debug, Clone)]
pub struct SeekBar {
    scrub: ScrubState,
    buffered_percent: f32,
    last_engine_percent: f32,
    epsilon: f32,
}

impl SeekBar {
    pub fn new(epsilon: f32) -> Self {
        Self {
            scrub: ScrubState::default(),
            buffered_percent: 0.0,
            last_engine_percent: 0.0,
            epsilon,
        }
    }

    pub fn state(&self) -> ScrubState {
        self.scrub
    }

    pub fn is_scrubbing(&self) -> bool {
        self.scrub.is_scrubbing
    }

    pub fn displayed_percent(&self) -> f32 {
        self.scrub.displayed_percent
    }

    pub fn buffered_percent(&self) -> f32 {
        self.buffered_percent
    }

    pub fn last_engine_percent(&self) -> f32 {
        self.last_engine_percent
    }

    /// Record engine progress. The display only follows while idle.
    pub fn sync_from_engine(&mut self, content_percent: f32, buffered_percent: f32) {
        self.last_engine_percent = clamp_unit(content_percent);
        self.buffered_percent = clamp_unit(buffered_percent);

        if self.scrub.is_scrubbing {
            trace!("Scrubbing, engine position not displayed");
            return;
        }
        self.scrub.displayed_percent = self.last_engine_percent;
    }

    pub fn begin_scrub(&mut self) {
        debug!("Scrub started at {:.3}", self.scrub.displayed_percent);
        self.scrub.is_scrubbing = true;
    }

    /// Move the scrub position by a horizontal delta over `width` pixels
    pub fn scrub_by(&mut self, dx: f32, width: u32) {
        if !self.scrub.is_scrubbing || width == 0 {
            return;
        }
        self.scrub.displayed_percent =
            clamp_unit(self.scrub.displayed_percent + dx / width as f32);
    }

    /// Leave the scrub. Returns the percent to seek to when the drag moved
    /// far enough from the engine position to be worth a seek.
    pub fn end_scrub(&mut self) -> Option<f32> {
        if !self.scrub.is_scrubbing {
            return None;
        }
        self.scrub.is_scrubbing = false;

        let target = self.scrub.displayed_percent;
        if (target - self.last_engine_percent).abs() + EPSILON_SLACK >= self.epsilon {
            debug!("Scrub released at {:.3}, seeking", target);
            Some(target)
        } else {
            debug!("Scrub released within epsilon of {:.3}", self.last_engine_percent);
            self.scrub.displayed_percent = self.last_engine_percent;
            None
        }
    }

    /// Abandon the scrub without seeking
    pub fn cancel_scrub(&mut self) {
        if self.scrub.is_scrubbing {
            debug!("Scrub cancelled");
        }
        self.scrub.is_scrubbing = false;
        self.scrub.displayed_percent = self.last_engine_percent;
    }

    /// Percent for a direct tap on the bar. Does not enter scrubbing.
    pub fn tap_to_seek(&mut self, x: f32, bar_width: u32) -> Option<f32> {
        if bar_width == 0 || self.scrub.is_scrubbing {
            return None;
        }
        let percent = clamp_unit(x / bar_width as f32);
        self.scrub.displayed_percent = percent;
        Some(percent)
    }

    /// Back to the state of a freshly loaded source
    pub fn reset(&mut self) {
        self.scrub = ScrubState::default();
        self.buffered_percent = 0.0;
        self.last_engine_percent = 0.0;
    }
}
