//! Closed-loop square detection.

use crate::util::{Bounds, Point};

/// Fewest points a square gesture may have.
pub const MIN_SQUARE_POINTS: usize = 4;
/// Largest allowed gap between the first and last sample of a closed loop.
pub const MAX_CLOSURE_GAP: f64 = 20.0;
/// Loops whose long/short side ratio reaches this value are not square.
pub const MAX_ASPECT_RATIO: f64 = 1.2;

const MAX_CORNER_RADIUS: f64 = 10.0;
const CORNER_RADIUS_RATIO: f64 = 0.1;

/// Cleaned-up square drawn in place of a recognized loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquareGeometry {
    pub center: Point,
    /// Side length
    pub size: f64,
    pub corner_radius: f64,
}

impl SquareGeometry {
    /// Square centered on `bounds`, with the longer side of the box.
    pub fn around(bounds: &Bounds) -> Self {
        let size = bounds.width().max(bounds.height());
        Self {
            center: bounds.center(),
            size,
            corner_radius: MAX_CORNER_RADIUS.min(size * CORNER_RADIUS_RATIO),
        }
    }

    pub fn bounds(&self) -> Bounds {
        let half = self.size / 2.0;
        Bounds {
            min_x: self.center.x - half,
            min_y: self.center.y - half,
            max_x: self.center.x + half,
            max_y: self.center.y + half,
        }
    }
}

/// Classifies a stroke as a square when it closes on itself and its bounding
/// box is close to equal-sided.
pub fn detect_square(points: &[Point]) -> Option<SquareGeometry> {
    if points.len() < MIN_SQUARE_POINTS {
        return None;
    }

    let first = points[0];
    let last = points[points.len() - 1];
    if first.distance_to(last) > MAX_CLOSURE_GAP {
        return None;
    }

    let bounds = Bounds::of_points(points)?;
    let long_side = bounds.width().max(bounds.height());
    let short_side = bounds.width().min(bounds.height());
    if short_side <= 0.0 || long_side / short_side >= MAX_ASPECT_RATIO {
        return None;
    }

    Some(SquareGeometry::around(&bounds))
}
