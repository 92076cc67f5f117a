// Control-surface tuning constants. Config defaults are taken from here so
// the values live in one place.

use std::time::Duration;

// === Gestures ===

/// Drags starting closer than this to any edge are ignored (density-independent units)
pub const EDGE_MARGIN_DP: f32 = 24.0;

// === Overlay ===

/// Inactivity window before the transport overlay hides itself
pub const OVERLAY_HIDE_DELAY: Duration = Duration::from_secs(5);

/// How long the volume/brightness HUD lingers after the last adjustment
pub const INDICATOR_HIDE_DELAY: Duration = Duration::from_millis(500);

// === Seeking ===

/// Minimum scrub distance (as a fraction of duration) that results in a seek
pub const SEEK_EPSILON: f32 = 0.01;

/// Position poll period while not scrubbing
pub const POSITION_POLL_INTERVAL: Duration = Duration::from_secs(1);

// === Brightness ===

/// Starting brightness when neither the window nor the system reports one
pub const FALLBACK_BRIGHTNESS: f32 = 0.5;
