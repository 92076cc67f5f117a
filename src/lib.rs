//! Playback controls for touch video players.
//!
//! [`controls::PlayerControls`] is the state machine behind a player
//! screen's overlay: it turns drags into seek, volume or brightness changes,
//! hides the overlay after inactivity and keeps the progress bar consistent
//! with an engine that reports its position asynchronously.
//! [`runtime::ControlsRuntime`] drives it on a tokio task with real timers.

pub mod config;
pub mod constants;
pub mod controls;
pub mod logging;
pub mod models;
pub mod player;
pub mod runtime;
pub mod utils;


pub use config::ControlsConfig;
pub use controls::{ControlInput, OverlaySnapshot, PlayerControls};
pub use runtime::{ControlsHandle, ControlsRuntime};
pub use utils::{ControlsError, Result};
