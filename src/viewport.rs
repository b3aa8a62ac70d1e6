//! Viewport transform for zoom and pan.
//!
//! Three coordinate spaces are involved:
//! - **device**: CSS pixels relative to the surface origin, as reported by pointer events
//! - **raster**: physical pixels of the backing surface (`device * device_pixel_ratio`)
//! - **plane**: the virtual drawing plane, independent of resolution, zoom and pan
//!
//! The plane maps onto the raster through the affine matrix
//! `(scale, 0, 0, scale, pan_x * scale, pan_y * scale)`.

use crate::util::Point;

/// Smallest scale, exclusive.
pub const MIN_SCALE: f64 = 0.1;
/// Largest scale, exclusive.
pub const MAX_SCALE: f64 = 10.0;

/// Zoom and pan state of one drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    scale: f64,
    pan_x: f64,
    pan_y: f64,
    device_pixel_ratio: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl ViewportState {
    /// Creates an unzoomed, unpanned viewport for the given device pixel ratio.
    ///
    /// Non-finite or non-positive ratios fall back to 1.0.
    pub fn new(device_pixel_ratio: f64) -> Self {
        Self {
            scale: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            device_pixel_ratio: sanitize_ratio(device_pixel_ratio),
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn pan(&self) -> (f64, f64) {
        (self.pan_x, self.pan_y)
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    pub(crate) fn set_device_pixel_ratio(&mut self, ratio: f64) {
        self.device_pixel_ratio = sanitize_ratio(ratio);
    }

    /// Returns true when `scale` lies strictly inside `(MIN_SCALE, MAX_SCALE)`.
    pub fn is_valid_scale(scale: f64) -> bool {
        scale > MIN_SCALE && scale < MAX_SCALE
    }

    /// Converts a pointer position (device pixels) into plane coordinates.
    pub fn device_to_plane(&self, x: f64, y: f64) -> Point {
        let (rx, ry) = self.device_to_raster(x, y);
        self.raster_to_plane(rx, ry)
    }

    /// Converts plane coordinates back into device pixels.
    pub fn plane_to_device(&self, point: Point) -> (f64, f64) {
        let (rx, ry) = self.plane_to_raster(point);
        (rx / self.device_pixel_ratio, ry / self.device_pixel_ratio)
    }

    pub fn device_to_raster(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.device_pixel_ratio, y * self.device_pixel_ratio)
    }

    pub fn raster_to_plane(&self, x: f64, y: f64) -> Point {
        Point::new(x / self.scale - self.pan_x, y / self.scale - self.pan_y)
    }

    pub fn plane_to_raster(&self, point: Point) -> (f64, f64) {
        (
            (point.x + self.pan_x) * self.scale,
            (point.y + self.pan_y) * self.scale,
        )
    }

    /// Plane-to-raster affine matrix, for pushing onto a Cairo context.
    pub fn render_matrix(&self) -> cairo::Matrix {
        cairo::Matrix::new(
            self.scale,
            0.0,
            0.0,
            self.scale,
            self.pan_x * self.scale,
            self.pan_y * self.scale,
        )
    }

    /// Zooms by `factor` around a pivot given in device pixels.
    ///
    /// The pivot's plane coordinates are the same before and after the zoom.
    /// Requests that would leave `(MIN_SCALE, MAX_SCALE)` are rejected and the
    /// state is left untouched. Returns whether the zoom was applied.
    pub fn zoom(&mut self, pivot_x: f64, pivot_y: f64, factor: f64) -> bool {
        let new_scale = self.scale * factor;
        if !new_scale.is_finite() || !Self::is_valid_scale(new_scale) {
            log::debug!(
                "Rejecting zoom to {:.3} (allowed range {}..{})",
                new_scale,
                MIN_SCALE,
                MAX_SCALE
            );
            return false;
        }

        let pivot = self.device_to_plane(pivot_x, pivot_y);
        let (raster_x, raster_y) = self.device_to_raster(pivot_x, pivot_y);

        self.pan_x = raster_x / new_scale - pivot.x;
        self.pan_y = raster_y / new_scale - pivot.y;
        self.scale = new_scale;
        true
    }

    /// Pans by a relative pointer movement given in device pixels.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        self.pan_x += dx / self.scale;
        self.pan_y += dy / self.scale;
    }

    /// Returns to scale 1 with no pan.
    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    /// Human-readable zoom/pan summary, e.g. `Zoom: 110%, Pan: (-4, 12)`.
    pub fn status_label(&self) -> String {
        format!(
            "Zoom: {}%, Pan: ({}, {})",
            (self.scale * 100.0).round() as i64,
            self.pan_x.round() as i64,
            self.pan_y.round() as i64
        )
    }
}

fn sanitize_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    }
}
