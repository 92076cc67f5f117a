use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use super::timers::TokioTimers;
use crate::config::ControlsConfig;
use crate::controls::{ControlInput, OverlaySnapshot, PlayerControls, TimerHandle, WindowHost};
use crate::models::EpisodeList;
use crate::player::{EngineEvent, PlaybackEngine};
use crate::utils::{ControlsError, Result};

/// Commands that can be sent to the controls runtime
#[derive(Debug)]
pub enum ControlsCommand {
    /// Pointer, engine or transport input
    Input(ControlInput),
    /// Load a new source
    Prepare {
        url: String,
        respond_to: oneshot::Sender<Result<()>>,
    },
    /// Replace the episode list
    LoadEpisodes { episodes: EpisodeList },
    /// Prepare and play one episode
    PlayEpisode {
        index: usize,
        respond_to: oneshot::Sender<Result<()>>,
    },
    /// Advance to the following episode
    PlayNextEpisode {
        respond_to: oneshot::Sender<Result<bool>>,
    },
    /// Read the current render projection
    Snapshot {
        respond_to: oneshot::Sender<OverlaySnapshot>,
    },
    /// Tear down and stop the loop
    Shutdown { respond_to: oneshot::Sender<()> },
}

/// Owns a [`PlayerControls`] and serializes everything onto one task.
///
/// Inputs from the UI, engine callbacks and timer firings all arrive over
/// channels and are applied in order, so the controls never need a lock.
/// After each step the render projection is published on a watch channel.
pub struct ControlsRuntime {
    controls: PlayerControls<TokioTimers>,
    receiver: mpsc::UnboundedReceiver<ControlsCommand>,
    timer_receiver: mpsc::UnboundedReceiver<TimerHandle>,
    snapshot_sender: watch::Sender<OverlaySnapshot>,
    cancel: CancellationToken,
}

impl ControlsRuntime {
    pub fn new(
        config: ControlsConfig,
        engine: Box<dyn PlaybackEngine>,
        window: Box<dyn WindowHost>,
    ) -> (ControlsHandle, ControlsRuntime) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (timer_sender, timer_receiver) = mpsc::unbounded_channel();

        let controls = PlayerControls::new(config, engine, window, TokioTimers::new(timer_sender));
        let (snapshot_sender, snapshot_receiver) = watch::channel(controls.snapshot());
        let cancel = CancellationToken::new();

        let runtime = ControlsRuntime {
            controls,
            receiver,
            timer_receiver,
            snapshot_sender,
            cancel: cancel.clone(),
        };
        let handle = ControlsHandle {
            sender,
            snapshot_receiver,
            cancel,
        };

        (handle, runtime)
    }

    /// Run the event loop until shutdown, cancellation or every handle is dropped
    pub async fn run(mut self) {
        debug!("Controls runtime started");
        self.controls.start();
        self.publish();

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    debug!("Controls runtime cancelled");
                    break;
                }
                Some(handle) = self.timer_receiver.recv() => {
                    self.controls.on_timer(handle);
                }
                command = self.receiver.recv() => {
                    let Some(command) = command else {
                        debug!("All controls handles dropped");
                        break;
                    };
                    if !self.process(command) {
                        break;
                    }
                }
            }
            self.publish();
        }

        self.controls.teardown();
        self.publish();
        info!("Controls runtime stopped");
    }

    /// Apply one command. Returns false when the loop should stop.
    fn process(&mut self, command: ControlsCommand) -> bool {
        match command {
            ControlsCommand::Input(ControlInput::Teardown) => {
                self.controls.teardown();
                return false;
            }
            ControlsCommand::Input(input) => {
                trace!("Input: {:?}", input);
                self.controls.handle(input);
            }
            ControlsCommand::Prepare { url, respond_to } => {
                let _ = respond_to.send(self.controls.prepare(&url));
            }
            ControlsCommand::LoadEpisodes { episodes } => {
                self.controls.load_episodes(episodes);
            }
            ControlsCommand::PlayEpisode { index, respond_to } => {
                let _ = respond_to.send(self.controls.play_episode(index));
            }
            ControlsCommand::PlayNextEpisode { respond_to } => {
                let _ = respond_to.send(self.controls.play_next_episode());
            }
            ControlsCommand::Snapshot { respond_to } => {
                let _ = respond_to.send(self.controls.snapshot());
            }
            ControlsCommand::Shutdown { respond_to } => {
                self.controls.teardown();
                let _ = respond_to.send(());
                return false;
            }
        }
        true
    }

    fn publish(&self) {
        let next = self.controls.snapshot();
        self.snapshot_sender.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

/// Cloneable handle for talking to a [`ControlsRuntime`]
#[derive(Debug, Clone)]
pub struct ControlsHandle {
    sender: mpsc::UnboundedSender<ControlsCommand>,
    snapshot_receiver: watch::Receiver<OverlaySnapshot>,
    cancel: CancellationToken,
}

impl ControlsHandle {
    /// Deliver an input without waiting for it to be applied
    pub fn send(&self, input: ControlInput) -> Result<()> {
        self.sender
            .send(ControlsCommand::Input(input))
            .map_err(|_| ControlsError::RuntimeClosed)
    }

    pub fn tap(&self) -> Result<()> {
        self.send(ControlInput::Tap)
    }

    pub fn double_tap(&self) -> Result<()> {
        self.send(ControlInput::DoubleTap)
    }

    pub fn drag_start(&self, x: f32, y: f32) -> Result<()> {
        self.send(ControlInput::DragStart { x, y })
    }

    pub fn drag(&self, dx: f32, dy: f32) -> Result<()> {
        self.send(ControlInput::Drag { dx, dy })
    }

    pub fn drag_stop(&self) -> Result<()> {
        self.send(ControlInput::DragStop)
    }

    pub fn drag_cancel(&self) -> Result<()> {
        self.send(ControlInput::DragCancel)
    }

    pub fn progress_bar_tap(&self, x: f32, bar_width: u32) -> Result<()> {
        self.send(ControlInput::ProgressBarTap { x, bar_width })
    }

    pub fn resize(&self, width: u32, height: u32) -> Result<()> {
        self.send(ControlInput::Resize { width, height })
    }

    pub fn play(&self) -> Result<()> {
        self.send(ControlInput::Play)
    }

    pub fn pause(&self) -> Result<()> {
        self.send(ControlInput::Pause)
    }

    pub fn toggle_play_pause(&self) -> Result<()> {
        self.send(ControlInput::TogglePlayPause)
    }

    pub fn seek_to(&self, position: Duration) -> Result<()> {
        self.send(ControlInput::SeekTo(position))
    }

    pub fn set_playback_rate(&self, rate: f32) -> Result<()> {
        self.send(ControlInput::SetPlaybackRate(rate))
    }

    pub fn toggle_fullscreen(&self) -> Result<()> {
        self.send(ControlInput::ToggleFullscreen)
    }

    /// Forward an engine callback. Engines marshal their callbacks here
    /// from whatever thread they run on.
    pub fn engine_event(&self, event: EngineEvent) -> Result<()> {
        self.send(ControlInput::Engine(event))
    }

    pub fn load_episodes(&self, episodes: EpisodeList) -> Result<()> {
        self.sender
            .send(ControlsCommand::LoadEpisodes { episodes })
            .map_err(|_| ControlsError::RuntimeClosed)
    }

    /// Load a new source
    pub async fn prepare(&self, url: &str) -> Result<()> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ControlsCommand::Prepare {
                url: url.to_string(),
                respond_to,
            })
            .map_err(|_| ControlsError::RuntimeClosed)?;
        response.await.map_err(|_| ControlsError::RuntimeClosed)?
    }

    pub async fn play_episode(&self, index: usize) -> Result<()> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ControlsCommand::PlayEpisode { index, respond_to })
            .map_err(|_| ControlsError::RuntimeClosed)?;
        response.await.map_err(|_| ControlsError::RuntimeClosed)?
    }

    pub async fn play_next_episode(&self) -> Result<bool> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ControlsCommand::PlayNextEpisode { respond_to })
            .map_err(|_| ControlsError::RuntimeClosed)?;
        response.await.map_err(|_| ControlsError::RuntimeClosed)?
    }

    /// Current projection, after every previously sent input has been applied
    pub async fn snapshot(&self) -> Result<OverlaySnapshot> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ControlsCommand::Snapshot { respond_to })
            .map_err(|_| ControlsError::RuntimeClosed)?;
        response.await.map_err(|_| ControlsError::RuntimeClosed)
    }

    /// Latest published projection, without a round trip
    pub fn latest(&self) -> OverlaySnapshot {
        *self.snapshot_receiver.borrow()
    }

    /// Receiver notified whenever the projection changes
    pub fn subscribe(&self) -> watch::Receiver<OverlaySnapshot> {
        self.snapshot_receiver.clone()
    }

    /// Tear down and wait for the runtime to acknowledge
    pub async fn shutdown(&self) -> Result<()> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ControlsCommand::Shutdown { respond_to })
            .map_err(|_| ControlsError::RuntimeClosed)?;
        response.await.map_err(|_| ControlsError::RuntimeClosed)
    }

    /// Stop the runtime without waiting; it tears down on its way out
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
