pub mod adapter;
pub mod telemetry;
pub mod traits;

pub use adapter::PlaybackAdapter;
pub use telemetry::{PlaybackStatus, PlaybackTelemetry};
pub use traits::{Command, Commands, EngineEvent, PlaybackEngine, PlaybackState, SuppressionReason};
