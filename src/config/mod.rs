//! Configuration file support for replayboard.
//!
//! Settings are read from `~/.config/replayboard/config.toml`. If no config
//! file exists, sensible defaults are used automatically.

pub mod types;

// Re-export commonly used types at module level
pub use types::{CanvasConfig, DrawingConfig, InputConfig, ReplayConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::session::{MAX_REPLAY_SPEED, MIN_REPLAY_SPEED, clamp_speed};

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [canvas]
/// width = 1024
/// height = 768
///
/// [drawing]
/// marker_radius = 4.0
/// marker_color = [0.1, 0.1, 0.1, 1.0]
///
/// [replay]
/// speed = 2.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, schemars::JsonSchema)]
pub struct Config {
    /// Drawing surface size
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// Shape appearance
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Replay timing
    #[serde(default)]
    pub replay: ReplayConfig,

    /// Input delivery tuning
    #[serde(default)]
    pub input: InputConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is
    /// logged.
    pub fn validate_and_clamp(&mut self) {
        if !(16..=8192).contains(&self.canvas.width) {
            log::warn!(
                "Invalid canvas width {}, clamping to 16-8192 range",
                self.canvas.width
            );
            self.canvas.width = self.canvas.width.clamp(16, 8192);
        }

        if !(16..=8192).contains(&self.canvas.height) {
            log::warn!(
                "Invalid canvas height {}, clamping to 16-8192 range",
                self.canvas.height
            );
            self.canvas.height = self.canvas.height.clamp(16, 8192);
        }

        if !(0.5..=20.0).contains(&self.drawing.line_width) {
            log::warn!(
                "Invalid line_width {:.1}, clamping to 0.5-20.0 range",
                self.drawing.line_width
            );
            self.drawing.line_width = self.drawing.line_width.clamp(0.5, 20.0);
        }

        if !(0.5..=20.0).contains(&self.drawing.polygon_line_width) {
            log::warn!(
                "Invalid polygon_line_width {:.1}, clamping to 0.5-20.0 range",
                self.drawing.polygon_line_width
            );
            self.drawing.polygon_line_width = self.drawing.polygon_line_width.clamp(0.5, 20.0);
        }

        if self.drawing.circle_min_radius == 0 {
            log::warn!("Invalid circle_min_radius 0, using 1");
            self.drawing.circle_min_radius = 1;
        }

        if self.drawing.circle_max_radius < self.drawing.circle_min_radius {
            log::warn!(
                "circle_max_radius {} is below circle_min_radius {}, raising it",
                self.drawing.circle_max_radius,
                self.drawing.circle_min_radius
            );
            self.drawing.circle_max_radius = self.drawing.circle_min_radius;
        }

        if !(1.0..=50.0).contains(&self.drawing.marker_radius) {
            log::warn!(
                "Invalid marker_radius {:.1}, clamping to 1.0-50.0 range",
                self.drawing.marker_radius
            );
            self.drawing.marker_radius = self.drawing.marker_radius.clamp(1.0, 50.0);
        }

        for i in 0..4 {
            if !(0.0..=1.0).contains(&self.drawing.marker_color[i]) {
                log::warn!(
                    "Invalid marker_color[{}] = {:.3}, clamping to 0.0-1.0",
                    i,
                    self.drawing.marker_color[i]
                );
                self.drawing.marker_color[i] = self.drawing.marker_color[i].clamp(0.0, 1.0);
            }
        }

        if !(MIN_REPLAY_SPEED..=MAX_REPLAY_SPEED).contains(&self.replay.speed) {
            self.replay.speed = clamp_speed(self.replay.speed);
        }

        if !(1..=4096).contains(&self.input.queue_capacity) {
            log::warn!(
                "Invalid queue_capacity {}, clamping to 1-4096 range",
                self.input.queue_capacity
            );
            self.input.queue_capacity = self.input.queue_capacity.clamp(1, 4096);
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("replayboard");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from `config_path`, or returns defaults if the file
    /// does not exist. All loaded values are validated and clamped.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or contains
    /// invalid TOML.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// JSON schema describing the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}
