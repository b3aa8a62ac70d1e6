//! Font descriptor for committed text.

/// Font configuration for text rendering.
///
/// Only the family is configurable; the size comes from the text commit
/// (by default the current line width times the configured font scale).
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    /// Font family name (e.g., "Sans", "Arial", "JetBrains Mono")
    pub family: String,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            family: "Sans".to_string(),
        }
    }
}

impl FontDescriptor {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
        }
    }

    /// Converts this descriptor to a Pango font description string.
    ///
    /// Sizes are given in pixels (`px` suffix) so text scales with the
    /// drawing plane the same way strokes do.
    pub fn to_pango_string(&self, size: f64) -> String {
        format!("{} {}px", self.family, size.max(1.0).round() as i32)
    }
}
