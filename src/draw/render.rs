//! Cairo renderer for the raster drawing surface.

use super::error::SurfaceError;
use super::stroke::{DrawingStyle, StrokeSegment};
use super::{Color, FontDescriptor};
use crate::recognize::{ArrowGeometry, SquareGeometry};
use crate::util::Point;
use crate::viewport::ViewportState;
use cairo::{Context, Format, ImageSurface, LineCap, LineJoin, Operator};
use std::f64::consts::PI;

/// Extra width added when erasing a stroke that became a square.
const SQUARE_ERASE_PADDING: f64 = 2.0;
/// Extra width added when erasing a stroke that became an arrow.
const ARROW_ERASE_PADDING: f64 = 4.0;

/// Owns the ARGB32 raster surface and issues every draw call onto it.
///
/// Plane-space operations take the current [`ViewportState`] and push its
/// matrix for the duration of the call; the context is never left transformed.
pub struct Renderer {
    surface: ImageSurface,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl Renderer {
    /// Creates a blank surface of `ceil(css * device_pixel_ratio)` raster pixels.
    pub fn new(
        css_width: u32,
        css_height: u32,
        device_pixel_ratio: f64,
    ) -> Result<Self, SurfaceError> {
        Ok(Self {
            surface: create_surface(css_width, css_height, device_pixel_ratio)?,
        })
    }

    /// Replaces the surface with a blank one of the new size.
    pub fn resize(
        &mut self,
        css_width: u32,
        css_height: u32,
        device_pixel_ratio: f64,
    ) -> Result<(), SurfaceError> {
        self.surface = create_surface(css_width, css_height, device_pixel_ratio)?;
        log::debug!(
            "Surface resized to {}x{} ({}x{} raster)",
            css_width,
            css_height,
            self.width(),
            self.height()
        );
        Ok(())
    }

    /// Raster width in pixels.
    pub fn width(&self) -> i32 {
        self.surface.width()
    }

    /// Raster height in pixels.
    pub fn height(&self) -> i32 {
        self.surface.height()
    }

    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    /// Renders one smoothed stroke segment.
    ///
    /// Segments are quadratic; Cairo only knows cubics, so the control point is
    /// raised to the equivalent cubic pair.
    pub fn draw_segment(
        &self,
        view: &ViewportState,
        segment: &StrokeSegment,
        style: &DrawingStyle,
    ) -> Result<(), SurfaceError> {
        self.with_view(view, |ctx| {
            style.color.apply(ctx);
            ctx.set_line_width(style.line_width);
            ctx.set_line_cap(LineCap::Round);
            ctx.set_line_join(LineJoin::Round);

            let (c1, c2) = quadratic_to_cubic(segment.start, segment.control, segment.end);
            ctx.move_to(segment.start.x, segment.start.y);
            ctx.curve_to(c1.x, c1.y, c2.x, c2.y, segment.end.x, segment.end.y);
            ctx.stroke()
        })
    }

    /// Removes the pixels of a stroke that is about to be redrawn as a square.
    ///
    /// The path is closed so the gap between the first and last sample is
    /// wiped as well.
    pub fn erase_original_drawing(
        &self,
        view: &ViewportState,
        points: &[Point],
        line_width: f64,
    ) -> Result<(), SurfaceError> {
        self.erase_polyline(view, points, line_width + SQUARE_ERASE_PADDING, true)
    }

    /// Removes the pixels of a stroke that is about to be redrawn as an arrow.
    pub fn erase_arrow_path(
        &self,
        view: &ViewportState,
        points: &[Point],
        line_width: f64,
    ) -> Result<(), SurfaceError> {
        self.erase_polyline(view, points, line_width + ARROW_ERASE_PADDING, false)
    }

    fn erase_polyline(
        &self,
        view: &ViewportState,
        points: &[Point],
        width: f64,
        closed: bool,
    ) -> Result<(), SurfaceError> {
        let Some((first, rest)) = points.split_first() else {
            return Ok(());
        };

        self.with_view(view, |ctx| {
            ctx.set_operator(Operator::DestOut);
            ctx.set_source_rgba(0.0, 0.0, 0.0, 1.0);
            ctx.set_line_width(width);
            ctx.set_line_cap(LineCap::Round);
            ctx.set_line_join(LineJoin::Round);

            ctx.move_to(first.x, first.y);
            for point in rest {
                ctx.line_to(point.x, point.y);
            }
            if closed {
                ctx.close_path();
            }
            ctx.stroke()
        })
    }

    /// Strokes a rounded square: four straight edges joined by quarter arcs.
    pub fn draw_square(
        &self,
        view: &ViewportState,
        square: &SquareGeometry,
        style: &DrawingStyle,
    ) -> Result<(), SurfaceError> {
        let bounds = square.bounds();
        let r = square.corner_radius;

        self.with_view(view, |ctx| {
            style.color.apply(ctx);
            ctx.set_line_width(style.line_width);
            ctx.set_line_join(LineJoin::Round);

            ctx.new_sub_path();
            ctx.arc(bounds.max_x - r, bounds.min_y + r, r, -PI / 2.0, 0.0);
            ctx.arc(bounds.max_x - r, bounds.max_y - r, r, 0.0, PI / 2.0);
            ctx.arc(bounds.min_x + r, bounds.max_y - r, r, PI / 2.0, PI);
            ctx.arc(bounds.min_x + r, bounds.min_y + r, r, PI, 3.0 * PI / 2.0);
            ctx.close_path();
            ctx.stroke()
        })
    }

    /// Draws the arrow shaft and its filled triangular head.
    pub fn draw_arrow(
        &self,
        view: &ViewportState,
        arrow: &ArrowGeometry,
        style: &DrawingStyle,
    ) -> Result<(), SurfaceError> {
        self.with_view(view, |ctx| {
            style.color.apply(ctx);
            ctx.set_line_width(style.line_width * 2.0);
            ctx.set_line_cap(LineCap::Round);
            ctx.move_to(arrow.tail.x, arrow.tail.y);
            ctx.line_to(arrow.shaft_end.x, arrow.shaft_end.y);
            ctx.stroke()?;

            ctx.move_to(arrow.tip.x, arrow.tip.y);
            ctx.line_to(arrow.barbs[0].x, arrow.barbs[0].y);
            ctx.line_to(arrow.barbs[1].x, arrow.barbs[1].y);
            ctx.close_path();
            ctx.fill()
        })
    }

    /// Renders text with its first baseline starting at `position`.
    ///
    /// Multi-line text is laid out by Pango using the font's line spacing.
    pub fn draw_text(
        &self,
        view: &ViewportState,
        position: Point,
        text: &str,
        color: Color,
        size: f64,
        font: &FontDescriptor,
    ) -> Result<(), SurfaceError> {
        self.with_view(view, |ctx| {
            ctx.set_antialias(cairo::Antialias::Best);

            let layout = pangocairo::functions::create_layout(ctx);
            let description = pango::FontDescription::from_string(&font.to_pango_string(size));
            layout.set_font_description(Some(&description));
            layout.set_text(text);

            // Pango positions layouts by their top-left corner.
            let baseline = layout.baseline() as f64 / pango::SCALE as f64;
            ctx.move_to(position.x, position.y - baseline);
            color.apply(ctx);
            pangocairo::functions::show_layout(ctx, &layout);
            Ok(())
        })
    }

    /// Wipes every pixel to transparent, ignoring the viewport.
    pub fn clear(&self) -> Result<(), SurfaceError> {
        let ctx = Context::new(&self.surface)?;
        ctx.set_operator(Operator::Clear);
        ctx.paint()?;
        Ok(())
    }

    /// Paints `image` stretched over the whole raster, ignoring the viewport.
    pub fn draw_image_fullscreen(&self, image: &ImageSurface) -> Result<(), SurfaceError> {
        if image.width() <= 0 || image.height() <= 0 {
            return Ok(());
        }
        let ctx = Context::new(&self.surface)?;
        ctx.scale(
            self.width() as f64 / image.width() as f64,
            self.height() as f64 / image.height() as f64,
        );
        ctx.set_source_surface(image, 0.0, 0.0)?;
        // Keeps the scaled edges from fading into transparency.
        ctx.source().set_extend(cairo::Extend::Pad);
        ctx.paint()?;
        Ok(())
    }

    /// Paints `image` at a plane position, one plane unit per image pixel.
    pub fn draw_image_at(
        &self,
        view: &ViewportState,
        image: &ImageSurface,
        position: Point,
    ) -> Result<(), SurfaceError> {
        self.with_view(view, |ctx| {
            ctx.set_source_surface(image, position.x, position.y)?;
            ctx.paint()
        })
    }

    /// Clears the surface and repaints a decoded snapshot through the viewport.
    pub fn draw_snapshot(
        &self,
        view: &ViewportState,
        snapshot: &ImageSurface,
    ) -> Result<(), SurfaceError> {
        self.clear()?;
        self.draw_image_at(view, snapshot, Point::new(0.0, 0.0))
    }

    /// Encodes the raw surface as PNG, independent of the viewport.
    pub fn encode_png(&self) -> Result<Vec<u8>, SurfaceError> {
        let mut bytes = Vec::new();
        self.surface.write_to_png(&mut bytes)?;
        Ok(bytes)
    }

    /// Decodes PNG bytes into a standalone image surface.
    pub fn decode_png(bytes: &[u8]) -> Result<ImageSurface, SurfaceError> {
        let mut reader = bytes;
        Ok(ImageSurface::create_from_png(&mut reader)?)
    }

    /// Premultiplied `(a, r, g, b)` of one raster pixel, or `None` outside the surface.
    pub fn pixel(&self, x: i32, y: i32) -> Option<(u8, u8, u8, u8)> {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return None;
        }

        let stride = self.surface.stride() as usize;
        let offset = y as usize * stride + x as usize * 4;
        let mut pixel = None;
        self.surface
            .with_data(|data| {
                pixel = data.get(offset..offset + 4).map(|bytes| {
                    let value = u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                    (
                        (value >> 24) as u8,
                        (value >> 16) as u8,
                        (value >> 8) as u8,
                        value as u8,
                    )
                });
            })
            .ok()?;
        pixel
    }

    /// Runs `draw` with the viewport matrix pushed, popping it afterwards.
    fn with_view<F>(&self, view: &ViewportState, draw: F) -> Result<(), SurfaceError>
    where
        F: FnOnce(&Context) -> Result<(), cairo::Error>,
    {
        let ctx = Context::new(&self.surface)?;
        ctx.save()?;
        ctx.transform(view.render_matrix());
        let result = draw(&ctx);
        ctx.restore()?;
        result.map_err(SurfaceError::from)
    }
}

fn create_surface(
    css_width: u32,
    css_height: u32,
    ratio: f64,
) -> Result<ImageSurface, SurfaceError> {
    let ratio = if ratio.is_finite() && ratio > 0.0 { ratio } else { 1.0 };
    let width = (css_width as f64 * ratio).ceil() as i32;
    let height = (css_height as f64 * ratio).ceil() as i32;
    if width <= 0 || height <= 0 {
        return Err(SurfaceError::InvalidSize { width, height });
    }
    Ok(ImageSurface::create(Format::ARgb32, width, height)?)
}

/// Control points of the cubic equivalent to a quadratic Bézier.
fn quadratic_to_cubic(start: Point, control: Point, end: Point) -> (Point, Point) {
    (start.lerp(control, 2.0 / 3.0), end.lerp(control, 2.0 / 3.0))
}
