use super::{DrawingSession, MAX_LINE_WIDTH, MIN_LINE_WIDTH, TextCommit};
use crate::config::{Action, ExportConfig, KeyBinding};
use crate::draw::{Color, ColorParseError, Renderer, SurfaceError};
use crate::export::{self, ExportError};
use crate::input::events::Key;
use crate::input::modifiers::Modifiers;
use crate::input::tool::Tool;
use crate::util::Point;
use std::path::PathBuf;

impl DrawingSession {
    /// Processes a key press against the keybinding map.
    ///
    /// Returns true when the combination is bound (the embedder should then
    /// suppress the platform's default handling).
    pub fn on_key_press(&mut self, key: Key, modifiers: Modifiers) -> bool {
        let Some(action) = self.find_action(key, modifiers) else {
            return false;
        };

        log::debug!("Key {:?} with {:?} -> {:?}", key, modifiers, action);
        if let Err(err) = self.handle_action(action) {
            log::warn!("{:?} failed: {}", action, err);
        }
        true
    }

    fn find_action(&self, key: Key, modifiers: Modifiers) -> Option<Action> {
        let binding = KeyBinding {
            key: key.binding_name()?,
            ctrl: modifiers.ctrl,
            shift: modifiers.shift,
            alt: modifiers.alt,
        };
        self.action_map.get(&binding).copied()
    }

    /// Runs a bound action.
    pub fn handle_action(&mut self, action: Action) -> Result<(), SurfaceError> {
        match action {
            Action::Undo => {
                self.undo();
            }
            Action::Redo => {
                self.redo();
            }
            Action::ClearCanvas => self.clear()?,
            Action::ResetView => self.reset_view(),
            Action::ToggleDarkMode => {
                self.toggle_dark_mode();
            }
            Action::SelectPen => self.select_tool(Tool::Pen),
            Action::SelectEraser => self.select_tool(Tool::Eraser),
        }
        Ok(())
    }

    /// Sets the pen color from a `#rgb` or `#rrggbb` string.
    ///
    /// On error the current color is kept.
    pub fn set_color(&mut self, hex: &str) -> Result<(), ColorParseError> {
        let color = Color::from_hex(hex)?;
        self.state.pen_color = color;
        log::debug!("Pen color set to {}", color.to_hex());
        Ok(())
    }

    /// Sets the line width, clamped to 1-100.
    pub fn set_line_width(&mut self, width: u32) {
        self.state.line_width = width.clamp(MIN_LINE_WIDTH, MAX_LINE_WIDTH);
    }

    pub fn select_tool(&mut self, tool: Tool) {
        self.state.tool = tool;
        log::debug!("Tool: {:?}", tool);
    }

    /// Flips between the light and dark theme. The raster is not touched.
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.state.dark_mode = !self.state.dark_mode;
        log::debug!(
            "Dark mode {}; background {}",
            if self.state.dark_mode { "on" } else { "off" },
            self.background_color().to_hex()
        );
        self.state.dark_mode
    }

    /// Wipes the surface and records the blank state.
    pub fn clear(&mut self) -> Result<(), SurfaceError> {
        self.settle_pending_now()?;
        self.renderer.clear()?;
        self.snapshot()?;
        log::info!("Canvas cleared");
        Ok(())
    }

    /// Renders committed text through the viewport and records it.
    ///
    /// Returns `Ok(false)` for blank text, which changes nothing.
    pub fn commit_text(&mut self, commit: &TextCommit) -> Result<bool, SurfaceError> {
        if commit.text.trim().is_empty() {
            return Ok(false);
        }

        self.settle_pending_now()?;
        let color = commit.color.unwrap_or_else(|| self.active_color());
        let size = commit
            .font_size
            .unwrap_or(self.state.line_width as f64 * self.settings.font_scale);
        self.renderer.draw_text(
            &self.viewport,
            Point::new(commit.plane_x, commit.plane_y),
            &commit.text,
            color,
            size,
            &self.settings.font,
        )?;
        self.snapshot()?;
        Ok(true)
    }

    /// Replaces the drawing with a PNG image stretched over the surface.
    ///
    /// A PNG that fails to decode leaves the surface and history untouched.
    pub fn load_image(&mut self, png: &[u8]) -> Result<(), SurfaceError> {
        let image = Renderer::decode_png(png)
            .inspect_err(|err| log::warn!("Ignoring image that failed to load: {}", err))?;

        self.settle_pending_now()?;
        self.renderer.clear()?;
        self.renderer.draw_image_fullscreen(&image)?;
        self.snapshot()?;
        log::info!("Loaded {}x{} image", image.width(), image.height());
        Ok(())
    }

    /// Draws a PNG image at a plane position on top of the drawing.
    pub fn paste_image(
        &mut self,
        png: &[u8],
        plane_x: f64,
        plane_y: f64,
    ) -> Result<(), SurfaceError> {
        let image = Renderer::decode_png(png)
            .inspect_err(|err| log::warn!("Ignoring image that failed to paste: {}", err))?;

        self.settle_pending_now()?;
        self.renderer
            .draw_image_at(&self.viewport, &image, Point::new(plane_x, plane_y))?;
        self.snapshot()?;
        Ok(())
    }

    /// PNG of the raw surface, independent of the viewport.
    pub fn export_png(&mut self) -> Result<Vec<u8>, SurfaceError> {
        self.settle_pending_now()?;
        self.renderer.encode_png()
    }

    /// Writes the surface PNG into the configured export directory.
    pub fn export_to_file(&mut self, config: &ExportConfig) -> Result<PathBuf, ExportError> {
        let png = self.export_png()?;
        let path = export::save_png(&png, config)?;
        log::info!("Exported drawing to {}", path.display());
        Ok(path)
    }

    /// Steps back one history entry. Returns false at the initial state.
    pub fn undo(&mut self) -> bool {
        if self.history.undo().is_none() {
            return false;
        }
        self.request_redraw();
        true
    }

    /// Re-applies the last undone entry. Returns false when there is none.
    pub fn redo(&mut self) -> bool {
        if self.history.redo().is_none() {
            return false;
        }
        self.request_redraw();
        true
    }

    /// Recreates the surface for a new size or pixel ratio and repaints the
    /// current history entry.
    pub fn resize(
        &mut self,
        css_width: u32,
        css_height: u32,
        device_pixel_ratio: f64,
    ) -> Result<(), SurfaceError> {
        self.pending_redraw = None;
        self.renderer.resize(css_width, css_height, device_pixel_ratio)?;
        self.viewport.set_device_pixel_ratio(device_pixel_ratio);
        self.request_redraw();
        Ok(())
    }
}
