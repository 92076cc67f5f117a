use serde::Serialize;

use super::indicator::IndicatorSnapshot;

/// Everything the UI layer needs to draw the overlay, recomputed after
/// every input
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct OverlaySnapshot {
    pub overlay_visible: bool,
    pub locked_visible: bool,
    pub displayed_percent: f32,
    pub buffered_percent: f32,
    pub volume_indicator: IndicatorSnapshot,
    pub brightness_indicator: IndicatorSnapshot,
    pub should_show_play_button: bool,
    pub is_playing: bool,
    pub is_buffering: bool,
    pub is_fullscreen: bool,
    pub is_scrubbing: bool,
}

impl OverlaySnapshot {
    /// Serialized form for UI layers on the other side of an FFI boundary
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
