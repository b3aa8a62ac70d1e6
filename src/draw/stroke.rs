//! Stroke capture and smoothing.

use super::Color;
use crate::util::Point;

/// Default interpolation factor between the previous point and a raw sample.
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.6;

/// Pen appearance, captured when a stroke starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawingStyle {
    pub color: Color,
    pub line_width: f64,
}

/// One quadratic curve emitted per raw sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeSegment {
    pub start: Point,
    pub control: Point,
    pub end: Point,
}

/// Converts raw pointer samples into a smoothed point sequence.
///
/// Each raw sample moves the pen `factor` of the way toward it. The emitted
/// segment is a quadratic curve whose control point is the previous point,
/// trading a little lag for visibly smoother lines.
#[derive(Debug, Clone)]
pub struct StrokeSmoother {
    factor: f64,
    points: Vec<Point>,
}

impl StrokeSmoother {
    /// Starts a new stroke at the pointer-down position.
    pub fn begin(start: Point, factor: f64) -> Self {
        Self {
            factor: factor.clamp(0.05, 1.0),
            points: vec![start],
        }
    }

    /// Feeds a raw sample and returns the segment to render.
    pub fn advance(&mut self, raw: Point) -> StrokeSegment {
        let prev = self.last();
        let smoothed = prev.lerp(raw, self.factor);
        self.points.push(smoothed);
        StrokeSegment {
            start: prev,
            control: prev,
            end: smoothed,
        }
    }

    /// Most recently recorded point.
    pub fn last(&self) -> Point {
        // `points` always holds the pointer-down position.
        self.points[self.points.len() - 1]
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Ends capture and hands over the recorded stroke.
    pub fn finish(self) -> Vec<Point> {
        self.points
    }
}
