//! Interactive drawing session.
//!
//! [`DrawingSession`] is the single owner and mutator of everything a drawing
//! surface needs: the viewport, the raster renderer, the undo history and the
//! per-gesture state. Embedders feed it pointer, wheel and key events and call
//! the toolbar-style operations; nothing is global, so several sessions can
//! live side by side.

mod actions;
mod pointer;
mod redraw;

#[cfg(test)]
mod tests;

use crate::config::{Action, Config, KeyBinding, KeybindingsConfig};
use crate::draw::{Color, DrawingStyle, FontDescriptor, Renderer, StrokeSmoother, SurfaceError};
use crate::history::{HistoryManager, HistorySnapshot, RedrawTicket, SnapshotDecoder};
use crate::input::tool::Tool;
use crate::recognize::ShapeRecognizer;
use crate::viewport::ViewportState;
use std::collections::HashMap;

/// Smallest line width the toolbar accepts.
pub const MIN_LINE_WIDTH: u32 = 1;
/// Largest line width the toolbar accepts.
pub const MAX_LINE_WIDTH: u32 = 100;

/// What the pointer is currently doing.
#[derive(Debug, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// Capturing a stroke; the style was fixed at pointer-down.
    Drawing {
        smoother: StrokeSmoother,
        style: DrawingStyle,
    },
    /// Dragging the view with the middle button.
    Panning,
}

/// Interaction state owned by one session.
#[derive(Debug)]
pub struct SessionState {
    pub tool: Tool,
    /// Pen ink; the eraser leaves it untouched
    pub pen_color: Color,
    pub line_width: u32,
    pub dark_mode: bool,
    pub gesture: GestureState,
}

impl SessionState {
    pub fn is_drawing(&self) -> bool {
        matches!(self.gesture, GestureState::Drawing { .. })
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, GestureState::Panning)
    }
}

/// Text committed by an on-canvas text widget.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCommit {
    /// Baseline start on the drawing plane
    pub plane_x: f64,
    pub plane_y: f64,
    pub text: String,
    /// Defaults to the active ink color
    pub color: Option<Color>,
    /// Defaults to the line width times the configured font scale
    pub font_size: Option<f64>,
}

impl TextCommit {
    pub fn new(plane_x: f64, plane_y: f64, text: impl Into<String>) -> Self {
        Self {
            plane_x,
            plane_y,
            text: text.into(),
            color: None,
            font_size: None,
        }
    }
}

/// Settings a session reads after construction.
#[derive(Debug, Clone)]
struct SessionSettings {
    smoothing_factor: f64,
    font: FontDescriptor,
    font_scale: f64,
    zoom_in_factor: f64,
    zoom_out_factor: f64,
    light_background: Color,
    dark_background: Color,
}

/// A redraw whose decode has been requested but not yet applied.
#[derive(Debug)]
struct PendingRedraw {
    ticket: RedrawTicket,
    snapshot: HistorySnapshot,
}

/// One drawing surface and its interaction state.
pub struct DrawingSession {
    state: SessionState,
    viewport: ViewportState,
    renderer: Renderer,
    history: HistoryManager,
    decoder: SnapshotDecoder,
    pending_redraw: Option<PendingRedraw>,
    recognizer: ShapeRecognizer,
    action_map: HashMap<KeyBinding, Action>,
    settings: SessionSettings,
}

impl DrawingSession {
    /// Creates a session with a blank surface of `css_width` x `css_height`
    /// CSS pixels at the given device pixel ratio.
    ///
    /// Snapshot decodes are spawned on `runtime`. The blank surface becomes the
    /// first history entry.
    pub fn new(
        config: &Config,
        css_width: u32,
        css_height: u32,
        device_pixel_ratio: f64,
        runtime: &tokio::runtime::Handle,
    ) -> Result<Self, SurfaceError> {
        let renderer = Renderer::new(css_width, css_height, device_pixel_ratio)?;
        let initial = HistorySnapshot::from_png(renderer.encode_png()?);

        let action_map = config.keybindings.build_action_map().unwrap_or_else(|err| {
            log::warn!("{}; using default keybindings", err);
            KeybindingsConfig::default()
                .build_action_map()
                .unwrap_or_default()
        });

        let drawing = &config.drawing;
        let settings = SessionSettings {
            smoothing_factor: drawing.smoothing_factor,
            font: FontDescriptor::new(drawing.font_family.clone()),
            font_scale: drawing.font_scale,
            zoom_in_factor: config.viewport.zoom_in_factor,
            zoom_out_factor: config.viewport.zoom_out_factor,
            light_background: config.theme.light_background.to_color(),
            dark_background: config.theme.dark_background.to_color(),
        };

        log::debug!(
            "Session created: {}x{} css px at ratio {}",
            css_width,
            css_height,
            device_pixel_ratio
        );

        Ok(Self {
            state: SessionState {
                tool: Tool::Pen,
                pen_color: drawing.default_color.to_color(),
                line_width: drawing
                    .default_line_width
                    .clamp(MIN_LINE_WIDTH, MAX_LINE_WIDTH),
                dark_mode: config.theme.dark_mode,
                gesture: GestureState::Idle,
            },
            viewport: ViewportState::new(device_pixel_ratio),
            renderer,
            history: HistoryManager::new(initial, config.history.max_snapshots),
            decoder: SnapshotDecoder::new(runtime),
            pending_redraw: None,
            recognizer: ShapeRecognizer::from_config(&config.recognition),
            action_map,
            settings,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// `Zoom: N%, Pan: (x, y)` for the current view.
    pub fn status_label(&self) -> String {
        self.viewport.status_label()
    }

    /// Background color of the active theme.
    pub fn background_color(&self) -> Color {
        if self.state.dark_mode {
            self.settings.dark_background
        } else {
            self.settings.light_background
        }
    }

    /// Ink used by the next stroke.
    pub fn active_color(&self) -> Color {
        match self.state.tool {
            Tool::Pen => self.state.pen_color,
            Tool::Eraser => self.background_color(),
        }
    }

    fn active_style(&self) -> DrawingStyle {
        DrawingStyle {
            color: self.active_color(),
            line_width: self.state.line_width as f64,
        }
    }

    /// Records the current raster as a new history entry.
    pub fn snapshot(&mut self) -> Result<(), SurfaceError> {
        let png = self.renderer.encode_png()?;
        self.history.push(HistorySnapshot::from_png(png));
        log::debug!(
            "History depth {} (redo {})",
            self.history.undo_depth(),
            self.history.redo_depth()
        );
        Ok(())
    }
}

impl std::fmt::Debug for DrawingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawingSession")
            .field("state", &self.state)
            .field("viewport", &self.viewport)
            .field("renderer", &self.renderer)
            .field("history", &self.history)
            .field("pending_redraw", &self.pending_redraw.as_ref().map(|p| p.ticket))
            .finish_non_exhaustive()
    }
}
