//! Keybinding configuration types and parsing.
//!
//! This module defines the configurable keybinding system that lets users
//! customize the keyboard shortcuts of the drawing surface.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// All actions that can be bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    // History
    Undo,
    Redo,

    // Canvas
    ClearCanvas,
    ResetView,

    // Theme and tools
    ToggleDarkMode,
    SelectPen,
    SelectEraser,
}

/// A single keybinding: a key name with optional modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyBinding {
    /// Parse a keybinding string like "Ctrl+Shift+Z" or "Delete".
    /// Modifiers can appear in any order and spaces around '+' are allowed
    /// (e.g., "Shift + Ctrl + Z"). Key names are stored lowercased.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty keybinding string".to_string());
        }

        let normalized = s.replace(" + ", "+").replace("+ ", "+").replace(" +", "+");

        let mut ctrl = false;
        let mut shift = false;
        let mut alt = false;
        let mut key_parts = Vec::new();

        for part in normalized.split('+') {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => ctrl = true,
                "shift" => shift = true,
                "alt" => alt = true,
                _ => key_parts.push(part),
            }
        }

        if key_parts.is_empty() {
            return Err(format!("No key specified in: {}", s));
        }

        // "Ctrl++" splits into empty parts around the '+' key itself
        let key = key_parts.join("+");
        let key = if key.is_empty() { "+".to_string() } else { key };

        Ok(Self {
            key: key.to_lowercase(),
            ctrl,
            shift,
            alt,
        })
    }
}

/// Configuration for all keybindings.
///
/// Each action can have multiple keybindings. Users specify them in config.toml as:
/// ```toml
/// [keybindings]
/// undo = ["Ctrl+Z"]
/// redo = ["Ctrl+Y", "Ctrl+Shift+Z"]
/// clear_canvas = ["Ctrl+Shift+Delete"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KeybindingsConfig {
    #[serde(default = "default_undo")]
    pub undo: Vec<String>,

    #[serde(default = "default_redo")]
    pub redo: Vec<String>,

    #[serde(default = "default_clear_canvas")]
    pub clear_canvas: Vec<String>,

    #[serde(default = "default_reset_view")]
    pub reset_view: Vec<String>,

    #[serde(default = "default_toggle_dark_mode")]
    pub toggle_dark_mode: Vec<String>,

    #[serde(default = "default_select_pen")]
    pub select_pen: Vec<String>,

    #[serde(default = "default_select_eraser")]
    pub select_eraser: Vec<String>,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            undo: default_undo(),
            redo: default_redo(),
            clear_canvas: default_clear_canvas(),
            reset_view: default_reset_view(),
            toggle_dark_mode: default_toggle_dark_mode(),
            select_pen: default_select_pen(),
            select_eraser: default_select_eraser(),
        }
    }
}

impl KeybindingsConfig {
    /// Build a lookup map from keybindings to actions.
    /// Returns an error if any keybinding string is invalid or if duplicates are detected.
    pub fn build_action_map(&self) -> Result<HashMap<KeyBinding, Action>, String> {
        let mut map = HashMap::new();

        let groups: [(&[String], Action); 7] = [
            (&self.undo, Action::Undo),
            (&self.redo, Action::Redo),
            (&self.clear_canvas, Action::ClearCanvas),
            (&self.reset_view, Action::ResetView),
            (&self.toggle_dark_mode, Action::ToggleDarkMode),
            (&self.select_pen, Action::SelectPen),
            (&self.select_eraser, Action::SelectEraser),
        ];

        for (bindings, action) in groups {
            for binding_str in bindings {
                let binding = KeyBinding::parse(binding_str)?;
                if let Some(existing_action) = map.insert(binding, action) {
                    return Err(format!(
                        "Duplicate keybinding '{}' assigned to both {:?} and {:?}",
                        binding_str, existing_action, action
                    ));
                }
            }
        }

        Ok(map)
    }
}

// =============================================================================
// Default keybinding functions
// =============================================================================

fn default_undo() -> Vec<String> {
    vec!["Ctrl+Z".to_string()]
}

fn default_redo() -> Vec<String> {
    vec!["Ctrl+Y".to_string(), "Ctrl+Shift+Z".to_string()]
}

fn default_clear_canvas() -> Vec<String> {
    vec!["Ctrl+Shift+Delete".to_string()]
}

fn default_reset_view() -> Vec<String> {
    vec!["Ctrl+0".to_string()]
}

fn default_toggle_dark_mode() -> Vec<String> {
    vec!["Ctrl+D".to_string()]
}

fn default_select_pen() -> Vec<String> {
    vec!["P".to_string()]
}

fn default_select_eraser() -> Vec<String> {
    vec!["E".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_key() {
        let binding = KeyBinding::parse("Delete").unwrap();
        assert_eq!(binding.key, "delete");
        assert!(!binding.ctrl);
        assert!(!binding.shift);
        assert!(!binding.alt);
    }

    #[test]
    fn test_parse_ctrl_shift_key() {
        let binding = KeyBinding::parse("Ctrl+Shift+Z").unwrap();
        assert_eq!(binding.key, "z");
        assert!(binding.ctrl);
        assert!(binding.shift);
        assert!(!binding.alt);
    }

    #[test]
    fn test_parse_with_spaces_and_any_order() {
        let spaced = KeyBinding::parse("Shift + Ctrl + Z").unwrap();
        assert_eq!(spaced, KeyBinding::parse("Ctrl+Shift+Z").unwrap());
    }

    #[test]
    fn test_parse_plus_key() {
        let binding = KeyBinding::parse("Ctrl++").unwrap();
        assert_eq!(binding.key, "+");
        assert!(binding.ctrl);
    }

    #[test]
    fn test_parse_rejects_modifier_only() {
        assert!(KeyBinding::parse("Ctrl+Shift").is_err());
        assert!(KeyBinding::parse("   ").is_err());
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let binding = KeyBinding::parse("Ctrl+Y").unwrap();
        assert_eq!(binding.key, "y");
        assert_eq!(binding, KeyBinding::parse("ctrl+y").unwrap());
        assert_ne!(binding, KeyBinding::parse("Ctrl+Shift+Y").unwrap());
    }

    #[test]
    fn test_build_action_map() {
        let map = KeybindingsConfig::default().build_action_map().unwrap();

        let ctrl_z = KeyBinding::parse("Ctrl+Z").unwrap();
        assert_eq!(map.get(&ctrl_z), Some(&Action::Undo));

        let ctrl_shift_z = KeyBinding::parse("Ctrl+Shift+Z").unwrap();
        assert_eq!(map.get(&ctrl_shift_z), Some(&Action::Redo));

        let clear = KeyBinding::parse("Ctrl+Shift+Delete").unwrap();
        assert_eq!(map.get(&clear), Some(&Action::ClearCanvas));
        assert_eq!(map.len(), 8);
    }

    #[test]
    fn test_duplicate_keybinding_detection() {
        let config = KeybindingsConfig {
            select_pen: vec!["Ctrl+Z".to_string()],
            ..KeybindingsConfig::default()
        };

        let err_msg = config.build_action_map().unwrap_err();
        assert!(err_msg.contains("Duplicate keybinding"));
        assert!(err_msg.contains("Ctrl+Z"));
    }

    #[test]
    fn test_duplicate_with_different_case_and_order() {
        let config = KeybindingsConfig {
            toggle_dark_mode: vec!["shift+ctrl+z".to_string()],
            ..KeybindingsConfig::default()
        };
        assert!(config.build_action_map().is_err());
    }
}
