pub mod gesture;
pub mod host;
pub mod indicator;
pub mod input;
pub mod seek_bar;
pub mod snapshot;
pub mod surface;
pub mod timer;
pub mod visibility;

pub use gesture::{AxisLock, DragTarget, GestureDisambiguator, GestureSession, RoutedDelta, Side};
pub use host::{BrightnessOverride, WindowHost};
pub use indicator::{IndicatorSnapshot, LevelAdjuster, TransientIndicator};
pub use input::ControlInput;
pub use seek_bar::{ScrubState, SeekBar};
pub use snapshot::OverlaySnapshot;
pub use surface::PlayerControls;
pub use timer::{ManualTimers, PendingTimer, TimerHandle, TimerKind, TimerScheduler};
pub use visibility::OverlayVisibility;
