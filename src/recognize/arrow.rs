//! Straight-stroke arrow detection.

use crate::util::{Point, angle_deviation};
use std::f64::consts::PI;

/// Fewest points an arrow gesture may have.
pub const MIN_ARROW_POINTS: usize = 10;
/// Shortest allowed distance between the stroke's endpoints.
pub const MIN_ARROW_LENGTH: f64 = 50.0;
/// How far any point may stray from the overall direction.
pub const STRAIGHTNESS_TOLERANCE: f64 = PI / 6.0;
/// Deviation near an endpoint that counts as a drawn barb.
pub const HEAD_DEVIATION: f64 = PI / 6.0;

const MAX_HEAD_WINDOW: f64 = 20.0;
const HEAD_WINDOW_RATIO: f64 = 0.3;
/// Points this close to a reference point have no meaningful direction.
const DIRECTION_EPSILON: f64 = 1.0;

const SHAFT_INSET: f64 = 15.0;
const BARB_LENGTH: f64 = 10.0;
const BARB_ANGLE: f64 = PI / 6.0;

/// Cleaned-up arrow drawn in place of a recognized stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowGeometry {
    pub tail: Point,
    pub tip: Point,
    /// Where the shaft stops, short of the tip
    pub shaft_end: Point,
    /// Back corners of the filled head triangle
    pub barbs: [Point; 2],
}

impl ArrowGeometry {
    pub fn from_endpoints(tail: Point, tip: Point) -> Self {
        let angle = tail.angle_to(tip);
        let shaft_end = tip.offset_polar(angle, -SHAFT_INSET);
        let barbs = [
            shaft_end.offset_polar(angle - BARB_ANGLE, -BARB_LENGTH),
            shaft_end.offset_polar(angle + BARB_ANGLE, -BARB_LENGTH),
        ];
        Self {
            tail,
            tip,
            shaft_end,
            barbs,
        }
    }
}

/// Largest barb deviation seen near each endpoint.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct HeadScan {
    start: f64,
    end: f64,
}

impl HeadScan {
    fn start_head(&self) -> bool {
        self.start > HEAD_DEVIATION
    }

    fn end_head(&self) -> bool {
        self.end > HEAD_DEVIATION
    }
}

/// Classifies a nearly straight stroke with a barb at one end as an arrow.
///
/// The tip is the end showing the stronger barb, so arrows drawn tail-first
/// and head-first both point the way the user meant.
pub fn detect_arrow(points: &[Point]) -> Option<ArrowGeometry> {
    if points.len() < MIN_ARROW_POINTS {
        return None;
    }

    let start = points[0];
    let end = points[points.len() - 1];
    let distance = start.distance_to(end);
    if distance < MIN_ARROW_LENGTH {
        return None;
    }

    let angle = start.angle_to(end);
    let head_window = MAX_HEAD_WINDOW.min(distance * HEAD_WINDOW_RATIO);
    if !is_straight(&points[1..points.len() - 1], start, angle) {
        return None;
    }

    let scan = scan_heads(&points[1..], start, end, angle, head_window);

    if !scan.start_head() && !scan.end_head() {
        return None;
    }

    let tip_at_start = scan.start_head() && (!scan.end_head() || scan.start > scan.end);
    log::debug!(
        "Arrow head deviation start={:.3} end={:.3}; tip at {}",
        scan.start,
        scan.end,
        if tip_at_start { "start" } else { "end" }
    );

    Some(if tip_at_start {
        ArrowGeometry::from_endpoints(end, start)
    } else {
        ArrowGeometry::from_endpoints(start, end)
    })
}

/// Every interior point must lie within the tolerance of the overall direction.
fn is_straight(interior: &[Point], start: Point, angle: f64) -> bool {
    interior
        .iter()
        .filter(|point| start.distance_to(**point) >= DIRECTION_EPSILON)
        .all(|point| angle_deviation(start.angle_to(*point), angle) <= STRAIGHTNESS_TOLERANCE)
}

fn scan_heads(points: &[Point], start: Point, end: Point, angle: f64, window: f64) -> HeadScan {
    let mut scan = HeadScan::default();

    for &point in points {
        let from_start = start.distance_to(point);
        if from_start < window && from_start >= DIRECTION_EPSILON {
            let deviation = angle_deviation(start.angle_to(point), angle);
            scan.start = scan.start.max(deviation);
        }

        let from_end = end.distance_to(point);
        if from_end < window && from_end >= DIRECTION_EPSILON {
            let deviation = angle_deviation(end.angle_to(point), angle + PI);
            scan.end = scan.end.max(deviation);
        }
    }

    scan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().copied().map(Point::from).collect()
    }

    fn barbed_at_end() -> Vec<Point> {
        let mut raw: Vec<(f64, f64)> = (0..9).map(|i| (i as f64 * 10.0, 0.0)).collect();
        raw.extend([(85.0, 0.0), (85.0, 10.0), (85.0, -10.0), (90.0, 0.0), (95.0, 0.0)]);
        raw.push((100.0, 0.0));
        pts(&raw)
    }

    #[test]
    fn barb_near_end_makes_arrow_pointing_there() {
        let points = barbed_at_end();
        assert_eq!(points.len(), 15);
        let arrow = detect_arrow(&points).expect("arrow expected");
        assert_eq!(arrow.tip, Point::new(100.0, 0.0));
        assert_eq!(arrow.tail, Point::new(0.0, 0.0));
    }

    #[test]
    fn straight_path_without_barb_is_not_arrow() {
        let points: Vec<Point> = (0..15)
            .map(|i| Point::new(i as f64 * 100.0 / 14.0, 0.0))
            .collect();
        assert!(detect_arrow(&points).is_none());
    }

    #[test]
    fn hooked_start_is_not_straight() {
        let mut raw = vec![(0.0, 0.0), (5.0, 8.0), (10.0, 12.0), (14.0, 9.0), (20.0, 0.0)];
        raw.extend((3..=10).map(|i| (i as f64 * 10.0, 0.0)));
        assert!(detect_arrow(&pts(&raw)).is_none());
    }

    #[test]
    fn barb_drawn_at_start_is_rejected() {
        let mut raw = vec![(0.0, 0.0), (15.0, 10.0), (15.0, -10.0), (5.0, 0.0)];
        raw.extend((1..=10).map(|i| (i as f64 * 10.0, 0.0)));
        assert!(detect_arrow(&pts(&raw)).is_none());
    }

    #[test]
    fn start_jitter_within_tolerance_keeps_end_tip() {
        // (12, 5) sits 22.6 degrees off the shaft: straight enough, no head.
        let mut raw = vec![(0.0, 0.0), (12.0, 5.0), (10.0, 0.0)];
        raw.extend((2..=8).map(|i| (i as f64 * 10.0, 0.0)));
        raw.extend([(88.0, 12.0), (88.0, -12.0), (95.0, 0.0), (100.0, 0.0)]);
        let arrow = detect_arrow(&pts(&raw)).expect("arrow expected");
        assert_eq!(arrow.tip, Point::new(100.0, 0.0));
        assert_eq!(arrow.tail, Point::new(0.0, 0.0));
    }

    #[test]
    fn short_or_sparse_strokes_are_rejected() {
        let short: Vec<Point> = (0..12).map(|i| Point::new(i as f64 * 3.0, 0.0)).collect();
        assert!(detect_arrow(&short).is_none());
        assert!(detect_arrow(&barbed_at_end()[..9]).is_none());
    }

    #[test]
    fn curved_stroke_is_rejected() {
        let points: Vec<Point> = (0..20)
            .map(|i| {
                let t = i as f64 / 19.0 * PI;
                Point::new(60.0 - 60.0 * t.cos(), 60.0 * t.sin())
            })
            .collect();
        assert!(detect_arrow(&points).is_none());
    }

    #[test]
    fn head_geometry_sits_behind_tip() {
        let arrow = ArrowGeometry::from_endpoints(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!((arrow.shaft_end.x - 85.0).abs() < 1e-9);
        assert!(arrow.shaft_end.y.abs() < 1e-9);
        for barb in arrow.barbs {
            assert!(barb.x < arrow.shaft_end.x);
            assert!(((barb.x - 85.0).hypot(barb.y) - 10.0).abs() < 1e-9);
        }
        assert!(arrow.barbs[0].y * arrow.barbs[1].y < 0.0);
    }
}
