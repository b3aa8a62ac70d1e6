//! Generic input event types.
//!
//! Embedders map their native pointer and key events onto these before
//! handing them to a [`DrawingSession`](super::DrawingSession).

use serde::{Deserialize, Serialize};

/// Button mask of a primary (left) press.
pub const PRIMARY_BUTTON_MASK: u16 = 1;
/// Button mask of a middle press, which drags the view instead of drawing.
pub const MIDDLE_BUTTON_MASK: u16 = 4;

/// Generic key representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Regular character key (a-z, 0-9, symbols)
    Char(char),
    Delete,
    Backspace,
    Escape,
    Return,
    Space,
    Tab,
    /// Unmapped or unrecognized key
    Unknown,
}

impl Key {
    /// Maps a key name as written in keybinding strings ("z", "Delete", "Space").
    pub fn from_name(name: &str) -> Self {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Key::Char(c);
        }

        match name.to_lowercase().as_str() {
            "delete" | "del" => Key::Delete,
            "backspace" => Key::Backspace,
            "escape" | "esc" => Key::Escape,
            "return" | "enter" => Key::Return,
            "space" => Key::Space,
            "tab" => Key::Tab,
            _ => Key::Unknown,
        }
    }

    /// Lowercase name used for keybinding lookup; `None` for unknown keys.
    pub fn binding_name(&self) -> Option<String> {
        let name = match self {
            Key::Char(c) => return Some(c.to_lowercase().collect()),
            Key::Delete => "delete",
            Key::Backspace => "backspace",
            Key::Escape => "escape",
            Key::Return => "return",
            Key::Space => "space",
            Key::Tab => "tab",
            Key::Unknown => return None,
        };
        Some(name.to_string())
    }
}

/// Kind of device that produced a pointer event.
///
/// Touch and pen contacts draw exactly like the primary mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerSource {
    #[default]
    Mouse,
    Touch,
    Pen,
}

/// One pointer sample in CSS pixels relative to the surface origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    /// Pressed-button bitmask (1 = primary, 2 = secondary, 4 = middle)
    pub buttons: u16,
    /// Movement since the previous event, in CSS pixels
    pub movement_x: f64,
    pub movement_y: f64,
    pub source: PointerSource,
}

impl PointerEvent {
    /// Primary-button mouse event at `(x, y)` with no movement.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            buttons: PRIMARY_BUTTON_MASK,
            movement_x: 0.0,
            movement_y: 0.0,
            source: PointerSource::Mouse,
        }
    }

    pub fn with_buttons(mut self, buttons: u16) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn with_movement(mut self, dx: f64, dy: f64) -> Self {
        self.movement_x = dx;
        self.movement_y = dy;
        self
    }

    pub fn with_source(mut self, source: PointerSource) -> Self {
        self.source = source;
        self
    }

    /// True when this press should start a view drag rather than a stroke.
    pub fn starts_pan(&self) -> bool {
        self.source == PointerSource::Mouse && self.buttons == MIDDLE_BUTTON_MASK
    }
}
