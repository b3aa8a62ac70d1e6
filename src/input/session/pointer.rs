use super::{DrawingSession, GestureState};
use crate::draw::{StrokeSmoother, SurfaceError};
use crate::input::events::PointerEvent;
use crate::input::tool::Tool;
use crate::recognize::Recognition;

impl DrawingSession {
    /// Processes a pointer press.
    ///
    /// # Behavior
    /// - Middle-button mouse press: starts dragging the view
    /// - Any other press: starts capturing a stroke at the pointer position
    ///   with the current tool's color and line width
    ///
    /// A press that arrives mid-stroke finishes the previous stroke first.
    pub fn on_pointer_down(&mut self, event: &PointerEvent) -> Result<(), SurfaceError> {
        if !matches!(self.state.gesture, GestureState::Idle) {
            self.finish_gesture()?;
        }

        if event.starts_pan() {
            self.state.gesture = GestureState::Panning;
            return Ok(());
        }

        self.settle_pending_now()?;
        let start = self.viewport.device_to_plane(event.x, event.y);
        self.state.gesture = GestureState::Drawing {
            smoother: StrokeSmoother::begin(start, self.settings.smoothing_factor),
            style: self.active_style(),
        };
        Ok(())
    }

    /// Processes pointer motion.
    ///
    /// # Behavior
    /// - While drawing: smooths the sample and renders the new segment
    /// - While panning: shifts the view by the event's movement and redraws
    /// - Otherwise: ignored
    pub fn on_pointer_move(&mut self, event: &PointerEvent) -> Result<(), SurfaceError> {
        match &self.state.gesture {
            GestureState::Idle => Ok(()),
            GestureState::Panning => {
                self.viewport.pan_by(event.movement_x, event.movement_y);
                self.request_redraw();
                Ok(())
            }
            GestureState::Drawing { .. } => {
                self.settle_pending_now()?;
                let raw = self.viewport.device_to_plane(event.x, event.y);
                if let GestureState::Drawing { smoother, style } = &mut self.state.gesture {
                    let segment = smoother.advance(raw);
                    self.renderer.draw_segment(&self.viewport, &segment, style)?;
                }
                Ok(())
            }
        }
    }

    /// Processes a pointer release, finishing the current gesture.
    ///
    /// Returns the classification of the finished stroke, or `None` when no
    /// stroke was being drawn.
    pub fn on_pointer_up(
        &mut self,
        _event: &PointerEvent,
    ) -> Result<Option<Recognition>, SurfaceError> {
        self.finish_gesture()
    }

    /// The pointer left the surface; an in-progress stroke is finished as if released.
    pub fn on_pointer_leave(
        &mut self,
        _event: &PointerEvent,
    ) -> Result<Option<Recognition>, SurfaceError> {
        self.finish_gesture()
    }

    /// Zooms around the pointer for one wheel step.
    ///
    /// Positive `delta_y` zooms out, anything else zooms in. Zoom requests
    /// outside the allowed scale range, and wheel input during a stroke, are
    /// ignored. Returns whether the view changed.
    pub fn on_wheel(&mut self, x: f64, y: f64, delta_y: f64) -> bool {
        if self.state.is_drawing() {
            return false;
        }

        let factor = if delta_y > 0.0 {
            self.settings.zoom_out_factor
        } else {
            self.settings.zoom_in_factor
        };

        if !self.viewport.zoom(x, y, factor) {
            return false;
        }
        log::debug!("{}", self.viewport.status_label());
        self.request_redraw();
        true
    }

    /// Returns to scale 1 with no pan and redraws.
    pub fn reset_view(&mut self) {
        self.viewport.reset();
        self.request_redraw();
    }

    /// Ends the current gesture. A captured stroke is classified; recognized
    /// shapes replace the freehand ink (erase first, then draw), and the
    /// result is recorded in history.
    fn finish_gesture(&mut self) -> Result<Option<Recognition>, SurfaceError> {
        let (smoother, style) = match std::mem::take(&mut self.state.gesture) {
            GestureState::Idle | GestureState::Panning => return Ok(None),
            GestureState::Drawing { smoother, style } => (smoother, style),
        };

        let points = smoother.finish();
        if points.len() < 2 {
            return Ok(Some(Recognition::Freehand));
        }

        self.settle_pending_now()?;

        let recognition = match self.state.tool {
            Tool::Pen => self.recognizer.classify(&points),
            Tool::Eraser => Recognition::Freehand,
        };

        match &recognition {
            Recognition::Square(square) => {
                self.renderer
                    .erase_original_drawing(&self.viewport, &points, style.line_width)?;
                self.renderer.draw_square(&self.viewport, square, &style)?;
            }
            Recognition::Arrow(arrow) => {
                self.renderer
                    .erase_arrow_path(&self.viewport, &points, style.line_width)?;
                self.renderer.draw_arrow(&self.viewport, arrow, &style)?;
            }
            Recognition::Freehand => {}
        }

        log::debug!(
            "Stroke of {} points classified as {}",
            points.len(),
            recognition.kind()
        );

        self.snapshot()?;
        Ok(Some(recognition))
    }
}
