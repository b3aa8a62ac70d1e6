//! Drawing tool selection.

use serde::{Deserialize, Serialize};

/// Drawing tool selection.
///
/// Both tools capture smoothed strokes; they differ only in the ink color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Draws with the pen color; finished strokes may become shapes
    #[default]
    Pen,
    /// Draws with the theme background color; never recognized as a shape
    Eraser,
}
