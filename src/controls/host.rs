/// Display brightness as the window sees it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrightnessOverride {
    /// No override; the system setting applies
    SystemDefault,
    Level(f32),
}

impl BrightnessOverride {
    pub fn level(self) -> Option<f32> {
        match self {
            BrightnessOverride::SystemDefault => None,
            BrightnessOverride::Level(value) => Some(value),
        }
    }
}

/// The window the player is shown in.
///
/// Injected into the controls so brightness and system-bar changes stay
/// outside the state machine.
pub trait WindowHost: Send {
    fn brightness_override(&self) -> BrightnessOverride;
    fn set_brightness_override(&mut self, value: BrightnessOverride);
    /// Current system brightness, if the platform exposes it
    fn system_brightness(&self) -> Option<f32>;
    fn set_system_bars_hidden(&mut self, hidden: bool);
}
