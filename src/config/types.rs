//! Configuration type definitions.

use super::enums::ColorSpec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Drawing-related settings.
///
/// Controls the pen when a session starts. Color and width can be changed at
/// runtime through the toolbar operations.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Default pen color - a named color (red, green, blue, yellow, orange, pink, white, black),
    /// a hex string like `"#336699"`, or an RGB array like `[255, 0, 0]`
    #[serde(default = "default_color")]
    pub default_color: ColorSpec,

    /// Default line width in pixels (valid range: 1 - 100)
    #[serde(default = "default_line_width")]
    pub default_line_width: u32,

    /// How far each pointer sample pulls the stroke toward it (valid range: 0.05 - 1.0).
    /// Lower values give smoother but laggier strokes; 1.0 disables smoothing
    #[serde(default = "default_smoothing_factor")]
    pub smoothing_factor: f64,

    /// Font family name for committed text (e.g., "Sans", "Monospace", "JetBrains Mono")
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Text size as a multiple of the current line width
    #[serde(default = "default_font_scale")]
    pub font_scale: f64,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_color: default_color(),
            default_line_width: default_line_width(),
            smoothing_factor: default_smoothing_factor(),
            font_family: default_font_family(),
            font_scale: default_font_scale(),
        }
    }
}

/// Light/dark theme settings.
///
/// The eraser paints with the active theme's background color.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ThemeConfig {
    /// Start in dark mode
    #[serde(default)]
    pub dark_mode: bool,

    /// Background color in light mode
    #[serde(default = "default_light_background")]
    pub light_background: ColorSpec,

    /// Background color in dark mode
    #[serde(default = "default_dark_background")]
    pub dark_background: ColorSpec,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            dark_mode: false,
            light_background: default_light_background(),
            dark_background: default_dark_background(),
        }
    }
}

/// Wheel zoom behavior.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ViewportConfig {
    /// Scale multiplier applied per wheel step toward the user (valid range: 1.01 - 2.0)
    #[serde(default = "default_zoom_in_factor")]
    pub zoom_in_factor: f64,

    /// Scale multiplier applied per wheel step away from the user (valid range: 0.5 - 0.99)
    #[serde(default = "default_zoom_out_factor")]
    pub zoom_out_factor: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            zoom_in_factor: default_zoom_in_factor(),
            zoom_out_factor: default_zoom_out_factor(),
        }
    }
}

/// Shape recognition toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RecognitionConfig {
    /// Master switch; when false every stroke stays freehand
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Replace closed, near-equal-sided loops with rounded squares
    #[serde(default = "default_true")]
    pub squares: bool,

    /// Replace straight strokes with a barb at one end with arrows
    #[serde(default = "default_true")]
    pub arrows: bool,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            squares: true,
            arrows: true,
        }
    }
}

/// Undo history settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct HistoryConfig {
    /// Maximum number of snapshots kept for undo (0 = unlimited)
    #[serde(default)]
    pub max_snapshots: usize,
}

/// PNG export settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExportConfig {
    /// Directory exported images are written to (`~` is expanded)
    #[serde(default = "default_save_directory")]
    pub save_directory: String,

    /// Filename template with chrono format specifiers; `.png` is appended
    #[serde(default = "default_filename_template")]
    pub filename_template: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            save_directory: default_save_directory(),
            filename_template: default_filename_template(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_color() -> ColorSpec {
    ColorSpec::Name("black".to_string())
}

fn default_line_width() -> u32 {
    2
}

fn default_smoothing_factor() -> f64 {
    crate::draw::DEFAULT_SMOOTHING_FACTOR
}

fn default_font_family() -> String {
    "Sans".to_string()
}

fn default_font_scale() -> f64 {
    5.0
}

fn default_light_background() -> ColorSpec {
    ColorSpec::Name("#f0f0f0".to_string())
}

fn default_dark_background() -> ColorSpec {
    ColorSpec::Name("#1e1e1e".to_string())
}

fn default_zoom_in_factor() -> f64 {
    1.1
}

fn default_zoom_out_factor() -> f64 {
    0.9
}

fn default_true() -> bool {
    true
}

fn default_save_directory() -> String {
    dirs::picture_dir()
        .map(|dir| dir.join("Inkboard").to_string_lossy().into_owned())
        .unwrap_or_else(|| "~/Pictures/Inkboard".to_string())
}

fn default_filename_template() -> String {
    "whiteboard_%Y-%m-%d_%H%M%S".to_string()
}
