//! Rendering primitives for the drawing surface (Cairo-based).
//!
//! This module defines the core drawing types:
//! - [`Color`]: RGBA color representation with predefined color constants
//! - [`StrokeSmoother`]: turns raw pointer samples into smoothed stroke segments
//! - [`Renderer`]: owns the raster surface and draws strokes, shapes, text and images

pub mod color;
pub mod error;
pub mod font;
pub mod render;
pub mod stroke;

pub use color::Color;
pub use error::{ColorParseError, SurfaceError};
pub use font::FontDescriptor;
pub use render::Renderer;
pub use stroke::{DEFAULT_SMOOTHING_FACTOR, DrawingStyle, StrokeSegment, StrokeSmoother};

pub use color::{BLACK, BLUE, GREEN, ORANGE, PINK, RED, WHITE, YELLOW};
