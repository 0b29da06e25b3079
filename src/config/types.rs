//! Configuration type definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Size of the drawing surface.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CanvasConfig {
    /// Surface width in pixels (valid range: 16 - 8192)
    #[serde(default = "default_canvas_width")]
    pub width: u32,

    /// Surface height in pixels (valid range: 16 - 8192)
    #[serde(default = "default_canvas_height")]
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
        }
    }
}

/// Shape appearance settings.
///
/// Circle colors and angles are always random; these settings control sizes
/// and the marker/outline color.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Stroke width of random circles in pixels (valid range: 0.5 - 20.0)
    #[serde(default = "default_line_width")]
    pub line_width: f64,

    /// Smallest random circle radius in pixels
    #[serde(default = "default_circle_min_radius")]
    pub circle_min_radius: u32,

    /// Largest random circle radius in pixels (at least `circle_min_radius`)
    #[serde(default = "default_circle_max_radius")]
    pub circle_max_radius: u32,

    /// Radius of markers in pixels (valid range: 1.0 - 50.0)
    #[serde(default = "default_marker_radius")]
    pub marker_radius: f64,

    /// Marker and polygon outline color [R, G, B, A] (0.0-1.0 range)
    #[serde(default = "default_marker_color")]
    pub marker_color: [f64; 4],

    /// Stroke width of polygon outlines in pixels (valid range: 0.5 - 20.0)
    #[serde(default = "default_polygon_line_width")]
    pub polygon_line_width: f64,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            line_width: default_line_width(),
            circle_min_radius: default_circle_min_radius(),
            circle_max_radius: default_circle_max_radius(),
            marker_radius: default_marker_radius(),
            marker_color: default_marker_color(),
            polygon_line_width: default_polygon_line_width(),
        }
    }
}

/// Replay timing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReplayConfig {
    /// Playback speed relative to the recording (valid range: 0.1 - 100.0)
    /// - 1.0 = original timing
    /// - 2.0 = every gap halved (default)
    #[serde(default = "default_replay_speed")]
    pub speed: f64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            speed: default_replay_speed(),
        }
    }
}

/// Input delivery tuning.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InputConfig {
    /// Events buffered per subscription before new ones are dropped (valid range: 1 - 4096)
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_canvas_width() -> u32 {
    800
}

fn default_canvas_height() -> u32 {
    600
}

fn default_line_width() -> f64 {
    2.0
}

fn default_circle_min_radius() -> u32 {
    30
}

fn default_circle_max_radius() -> u32 {
    200
}

fn default_marker_radius() -> f64 {
    5.0
}

fn default_marker_color() -> [f64; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn default_polygon_line_width() -> f64 {
    2.0
}

fn default_replay_speed() -> f64 {
    2.0
}

fn default_queue_capacity() -> usize {
    64
}
