#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use touchplay::controls::{BrightnessOverride, WindowHost};
use touchplay::player::{Commands, PlaybackEngine, PlaybackState, PlaybackTelemetry};
use touchplay::{ControlsError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    SetSource(String),
    Prepare,
    PlayWhenReady(bool),
    SeekTo(Duration),
    SetVolume(f32),
    SetPlaybackRate(f32),
    Release,
}

#[derive(Debug)]
struct MockEngineState {
    calls: Vec<MockCall>,
    telemetry: PlaybackTelemetry,
    position: Duration,
    duration: Option<Duration>,
    buffered: Duration,
    error_mode: Option<String>,
}

/// Engine double whose clones share state with the copy handed to the
/// controls
#[derive(Debug, Clone)]
pub struct MockEngine {
    state: Arc<Mutex<MockEngineState>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockEngineState {
                calls: Vec::new(),
                telemetry: PlaybackTelemetry::default(),
                position: Duration::ZERO,
                duration: None,
                buffered: Duration::ZERO,
                error_mode: None,
            })),
        }
    }

    /// A prepared source of `duration` with every command available
    pub fn loaded(duration: Duration) -> Self {
        let engine = Self::new();
        {
            let mut state = engine.state.lock().unwrap();
            state.telemetry.available_commands = Commands::all();
            state.telemetry.playback_state = PlaybackState::Ready;
            state.duration = Some(duration);
        }
        engine
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn seeks(&self) -> Vec<Duration> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MockCall::SeekTo(position) => Some(position),
                _ => None,
            })
            .collect()
    }

    pub fn set_position(&self, position: Duration) {
        self.state.lock().unwrap().position = position;
    }

    pub fn set_buffered(&self, buffered: Duration) {
        self.state.lock().unwrap().buffered = buffered;
    }

    pub fn inject_error(&self, error: &str) {
        self.state.lock().unwrap().error_mode = Some(error.to_string());
    }

    fn record(&self, call: MockCall) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match &state.error_mode {
            Some(error) => Err(ControlsError::Engine(error.clone())),
            None => Ok(()),
        }
    }
}

impl PlaybackEngine for MockEngine {
    fn set_source(&mut self, url: &str) -> Result<()> {
        self.record(MockCall::SetSource(url.to_string()))
    }

    fn prepare(&mut self) -> Result<()> {
        self.record(MockCall::Prepare)
    }

    fn set_play_when_ready(&mut self, play_when_ready: bool) -> Result<()> {
        self.record(MockCall::PlayWhenReady(play_when_ready))
    }

    fn seek_to(&mut self, position: Duration) -> Result<()> {
        self.state.lock().unwrap().position = position;
        self.record(MockCall::SeekTo(position))
    }

    fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.record(MockCall::SetVolume(volume))
    }

    fn set_playback_rate(&mut self, rate: f32) -> Result<()> {
        self.record(MockCall::SetPlaybackRate(rate))
    }

    fn position(&self) -> Duration {
        self.state.lock().unwrap().position
    }

    fn duration(&self) -> Option<Duration> {
        self.state.lock().unwrap().duration
    }

    fn buffered_position(&self) -> Duration {
        self.state.lock().unwrap().buffered
    }

    fn telemetry(&self) -> PlaybackTelemetry {
        self.state.lock().unwrap().telemetry
    }

    fn release(&mut self) {
        let _ = self.record(MockCall::Release);
    }
}

#[derive(Debug)]
struct MockWindowState {
    brightness: BrightnessOverride,
    system_brightness: Option<f32>,
    bars_hidden: bool,
}

#[derive(Debug, Clone)]
pub struct MockWindow {
    state: Arc<Mutex<MockWindowState>>,
}

impl MockWindow {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockWindowState {
                brightness: BrightnessOverride::SystemDefault,
                system_brightness: Some(0.5),
                bars_hidden: false,
            })),
        }
    }

    pub fn brightness(&self) -> BrightnessOverride {
        self.state.lock().unwrap().brightness
    }

    pub fn bars_hidden(&self) -> bool {
        self.state.lock().unwrap().bars_hidden
    }
}

impl WindowHost for MockWindow {
    fn brightness_override(&self) -> BrightnessOverride {
        self.state.lock().unwrap().brightness
    }

    fn set_brightness_override(&mut self, value: BrightnessOverride) {
        self.state.lock().unwrap().brightness = value;
    }

    fn system_brightness(&self) -> Option<f32> {
        self.state.lock().unwrap().system_brightness
    }

    fn set_system_bars_hidden(&mut self, hidden: bool) {
        self.state.lock().unwrap().bars_hidden = hidden;
    }
}
