//! Configuration file support for inkboard.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/inkboard/config.toml`. Settings include pen defaults, theme
//! colors, zoom steps, recognition toggles, history depth, export location and
//! keybindings.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod keybindings;
pub mod types;

pub use enums::ColorSpec;
pub use keybindings::{Action, KeyBinding, KeybindingsConfig};
pub use types::{
    DrawingConfig, ExportConfig, HistoryConfig, RecognitionConfig, ThemeConfig, ViewportConfig,
};

use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// default_color = "#1a73e8"
/// default_line_width = 3
///
/// [theme]
/// dark_mode = true
///
/// [viewport]
/// zoom_in_factor = 1.25
///
/// [history]
/// max_snapshots = 50
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Pen defaults and stroke smoothing
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Light/dark background colors
    #[serde(default)]
    pub theme: ThemeConfig,

    /// Wheel zoom steps
    #[serde(default)]
    pub viewport: ViewportConfig,

    /// Shape recognition toggles
    #[serde(default)]
    pub recognition: RecognitionConfig,

    /// Undo history depth
    #[serde(default)]
    pub history: HistoryConfig,

    /// PNG export location
    #[serde(default)]
    pub export: ExportConfig,

    /// Keyboard shortcuts
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `default_line_width`: 1 - 100
    /// - `smoothing_factor`: 0.05 - 1.0
    /// - `font_scale`: 1.0 - 20.0
    /// - `zoom_in_factor`: 1.01 - 2.0
    /// - `zoom_out_factor`: 0.5 - 0.99
    pub fn validate_and_clamp(&mut self) {
        if !(1..=100).contains(&self.drawing.default_line_width) {
            warn!(
                "Invalid default_line_width {}, clamping to 1-100 range",
                self.drawing.default_line_width
            );
            self.drawing.default_line_width = self.drawing.default_line_width.clamp(1, 100);
        }

        clamp_f64(
            &mut self.drawing.smoothing_factor,
            0.05,
            1.0,
            "smoothing_factor",
        );
        clamp_f64(&mut self.drawing.font_scale, 1.0, 20.0, "font_scale");
        clamp_f64(
            &mut self.viewport.zoom_in_factor,
            1.01,
            2.0,
            "zoom_in_factor",
        );
        clamp_f64(
            &mut self.viewport.zoom_out_factor,
            0.5,
            0.99,
            "zoom_out_factor",
        );

        if self.drawing.font_family.trim().is_empty() {
            warn!("Empty font_family, falling back to 'Sans'");
            self.drawing.font_family = "Sans".to_string();
        }

        if self.drawing.default_color.try_to_color().is_none() {
            warn!(
                "Invalid default_color {:?}, falling back to black",
                self.drawing.default_color
            );
            self.drawing.default_color = ColorSpec::Name("black".to_string());
        }

        for (name, spec, fallback) in [
            ("light_background", &mut self.theme.light_background, "#f0f0f0"),
            ("dark_background", &mut self.theme.dark_background, "#1e1e1e"),
        ] {
            if spec.try_to_color().is_none() {
                warn!("Invalid {} {:?}, falling back to {}", name, spec, fallback);
                *spec = ColorSpec::Name(fallback.to_string());
            }
        }

        if self.export.filename_template.trim().is_empty() {
            warn!("Empty filename_template, using default");
            self.export.filename_template = ExportConfig::default().filename_template;
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/inkboard/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("inkboard");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates the configuration file at `path`.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file contains invalid TOML syntax
    /// - The keybindings contain an invalid or duplicate entry
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config = Self::from_toml_str(&config_str)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
        config.validate_and_clamp();

        info!("Loaded config from {}", path.display());
        debug!("Config: {:?}", config);
        Ok(config)
    }

    /// Parses TOML text and checks the keybindings; values are not clamped.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).context("Failed to parse config")?;
        config
            .keybindings
            .build_action_map()
            .map_err(|err| anyhow!(err))
            .context("Invalid keybindings")?;
        Ok(config)
    }

    /// JSON schema describing the config file, for editor tooling.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

fn clamp_f64(value: &mut f64, min: f64, max: f64, name: &str) {
    if !value.is_finite() {
        warn!("Invalid {} {}, using {:.2}", name, value, min);
        *value = min;
    } else if !(min..=max).contains(value) {
        warn!(
            "Invalid {} {:.3}, clamping to {}-{} range",
            name, value, min, max
        );
        *value = value.clamp(min, max);
    }
}
