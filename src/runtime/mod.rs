pub mod controller;
pub mod timers;

pub use controller::{ControlsCommand, ControlsHandle, ControlsRuntime};
pub use timers::TokioTimers;
