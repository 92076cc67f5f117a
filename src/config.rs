use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::constants;
use crate::utils::ControlsError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ControlsConfig {
    #[serde(default)]
    pub gesture: GestureConfig,

    #[serde(default)]
    pub overlay: OverlayConfig,

    #[serde(default)]
    pub indicator: IndicatorConfig,

    #[serde(default)]
    pub seek: SeekConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    #[serde(default = "default_edge_margin_dp")]
    pub edge_margin_dp: f32,

    /// Pixels per density-independent unit on the target display
    #[serde(default = "default_density")]
    pub density: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    #[serde(default = "default_overlay_hide_delay_ms")]
    pub hide_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    #[serde(default = "default_indicator_hide_delay_ms")]
    pub hide_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeekConfig {
    #[serde(default = "default_seek_epsilon")]
    pub epsilon: f32,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl ControlsConfig {
    /// Load from the user config directory, writing defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            info!("No controls config found, using defaults");
            let config = ControlsConfig::default();
            config.save_to_path(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        debug!("Loading controls config from {:?}", path);
        let contents = fs::read_to_string(path).context("Failed to read controls config")?;
        let config = Self::from_toml_str(&contents).context("Failed to parse controls config")?;
        info!("Controls config loaded successfully");
        Ok(config)
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> crate::utils::Result<Self> {
        let config: ControlsConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize controls config")?;
        fs::write(path, contents).context("Failed to write controls config")?;

        debug!("Controls config saved to {:?}", path);
        Ok(())
    }

    pub fn validate(&self) -> crate::utils::Result<()> {
        if !(self.gesture.edge_margin_dp >= 0.0) {
            return Err(ControlsError::Config(format!(
                "gesture.edge_margin_dp must be non-negative, got {}",
                self.gesture.edge_margin_dp
            )));
        }
        if !(self.gesture.density > 0.0) {
            return Err(ControlsError::Config(format!(
                "gesture.density must be positive, got {}",
                self.gesture.density
            )));
        }
        if self.seek.poll_interval_ms == 0 {
            return Err(ControlsError::Config(
                "seek.poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.seek.epsilon) {
            return Err(ControlsError::Config(format!(
                "seek.epsilon must be in [0, 1), got {}",
                self.seek.epsilon
            )));
        }
        Ok(())
    }

    /// Edge margin in physical pixels
    pub fn edge_margin_px(&self) -> f32 {
        self.gesture.edge_margin_dp * self.gesture.density
    }

    pub fn overlay_hide_delay(&self) -> Duration {
        Duration::from_millis(self.overlay.hide_delay_ms)
    }

    pub fn indicator_hide_delay(&self) -> Duration {
        Duration::from_millis(self.indicator.hide_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.seek.poll_interval_ms)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to get config directory")?;
        Ok(config_dir.join("touchplay").join("controls.toml"))
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            edge_margin_dp: default_edge_margin_dp(),
            density: default_density(),
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            hide_delay_ms: default_overlay_hide_delay_ms(),
        }
    }
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            hide_delay_ms: default_indicator_hide_delay_ms(),
        }
    }
}

impl Default for SeekConfig {
    fn default() -> Self {
        Self {
            epsilon: default_seek_epsilon(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

// Default value functions
fn default_edge_margin_dp() -> f32 { constants::EDGE_MARGIN_DP }
fn default_density() -> f32 { 1.0 }
fn default_overlay_hide_delay_ms() -> u64 { constants::OVERLAY_HIDE_DELAY.as_millis() as u64 }
fn default_indicator_hide_delay_ms() -> u64 { constants::INDICATOR_HIDE_DELAY.as_millis() as u64 }
fn default_seek_epsilon() -> f32 { constants::SEEK_EPSILON }
fn default_poll_interval_ms() -> u64 { constants::POSITION_POLL_INTERVAL.as_millis() as u64 }
