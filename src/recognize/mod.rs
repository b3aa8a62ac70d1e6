//! Gesture recognition for finished strokes.
//!
//! A finished stroke is classified as one of:
//! - a closed, near-equal-sided loop: replaced with a rounded [`SquareGeometry`]
//! - a nearly straight line with a barb at one end: replaced with an [`ArrowGeometry`]
//! - anything else: left as freehand ink
//!
//! Squares are tried first; the first match wins.

pub mod arrow;
pub mod square;

pub use arrow::{ArrowGeometry, detect_arrow};
pub use square::{SquareGeometry, detect_square};

use crate::config::RecognitionConfig;
use crate::util::Point;

/// Outcome of classifying a stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Recognition {
    Square(SquareGeometry),
    Arrow(ArrowGeometry),
    Freehand,
}

impl Recognition {
    pub fn kind(&self) -> &'static str {
        match self {
            Recognition::Square(_) => "square",
            Recognition::Arrow(_) => "arrow",
            Recognition::Freehand => "freehand",
        }
    }

    pub fn is_shape(&self) -> bool {
        !matches!(self, Recognition::Freehand)
    }
}

/// Runs the enabled classifiers in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeRecognizer {
    squares: bool,
    arrows: bool,
}

impl Default for ShapeRecognizer {
    fn default() -> Self {
        Self {
            squares: true,
            arrows: true,
        }
    }
}

impl ShapeRecognizer {
    pub fn from_config(config: &RecognitionConfig) -> Self {
        Self {
            squares: config.enabled && config.squares,
            arrows: config.enabled && config.arrows,
        }
    }

    pub fn classify(&self, points: &[Point]) -> Recognition {
        if self.squares {
            if let Some(square) = detect_square(points) {
                return Recognition::Square(square);
            }
        }

        if self.arrows {
            if let Some(arrow) = detect_arrow(points) {
                return Recognition::Arrow(arrow);
            }
        }

        Recognition::Freehand
    }
}
