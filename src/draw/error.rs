//! Errors raised while drawing onto, encoding or decoding the raster surface.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Cairo operation failed: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("PNG encoding or decoding failed: {0}")]
    Png(#[from] cairo::IoError),

    #[error("Surface pixel data unavailable: {0}")]
    Borrow(#[from] cairo::BorrowError),

    #[error("Invalid surface size {width}x{height}")]
    InvalidSize { width: i32, height: i32 },

    #[error("Decoded image has mismatched layout: {0}")]
    Layout(String),

    #[error("Snapshot decoder stopped before replying")]
    DecoderGone,
}

/// A toolbar color string that is neither `#rgb` nor `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid color '{0}': expected #rgb or #rrggbb")]
pub struct ColorParseError(pub String);
