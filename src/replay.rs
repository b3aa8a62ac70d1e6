//! Headless gesture replay.
//!
//! A replay script is a JSON array of tagged events, for example:
//!
//! ```json
//! [
//!   { "type": "down", "x": 10, "y": 10 },
//!   { "type": "move", "x": 60, "y": 12 },
//!   { "type": "up", "x": 60, "y": 12 },
//!   { "type": "key", "combo": "Ctrl+Z" }
//! ]
//! ```
//!
//! Events are fed to a [`DrawingSession`] one at a time; redraws are settled
//! after every event so each one sees a fully painted surface.

use crate::config::KeyBinding;
use crate::draw::{Color, ColorParseError, SurfaceError};
use crate::input::{
    DrawingSession, Key, Modifiers, PRIMARY_BUTTON_MASK, PointerEvent, PointerSource, TextCommit,
    Tool,
};
use crate::recognize::Recognition;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or replaying a script.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed script {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Event {index}: {source}")]
    Surface { index: usize, source: SurfaceError },

    #[error("Event {index}: {source}")]
    Color {
        index: usize,
        source: ColorParseError,
    },

    #[error("Event {index}: invalid key combination: {message}")]
    Key { index: usize, message: String },
}

fn default_buttons() -> u16 {
    PRIMARY_BUTTON_MASK
}

/// One recorded input event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayEvent {
    Down {
        x: f64,
        y: f64,
        #[serde(default = "default_buttons")]
        buttons: u16,
        #[serde(default)]
        source: PointerSource,
    },
    Move {
        x: f64,
        y: f64,
        /// Movement since the previous event; derived from positions when absent
        #[serde(default)]
        dx: Option<f64>,
        #[serde(default)]
        dy: Option<f64>,
    },
    Up {
        x: f64,
        y: f64,
    },
    Leave {
        x: f64,
        y: f64,
    },
    Wheel {
        x: f64,
        y: f64,
        delta_y: f64,
    },
    /// Key combination in keybinding syntax, e.g. `Ctrl+Shift+Z`
    Key {
        combo: String,
    },
    Color {
        value: String,
    },
    LineWidth {
        value: u32,
    },
    Tool {
        tool: Tool,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        size: Option<f64>,
    },
    Clear,
    Undo,
    Redo,
    DarkMode,
}

/// What a replay did to the session.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaySummary {
    pub events_applied: usize,
    /// Classification of every finished stroke, in order
    pub strokes: Vec<Recognition>,
    pub history_depth: usize,
    pub status_label: String,
}

impl ReplaySummary {
    pub fn shapes_recognized(&self) -> usize {
        self.strokes.iter().filter(|stroke| stroke.is_shape()).count()
    }
}

impl fmt::Display for ReplaySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Events applied: {}", self.events_applied)?;
        writeln!(
            f,
            "Strokes: {} ({} recognized as shapes)",
            self.strokes.len(),
            self.shapes_recognized()
        )?;
        writeln!(f, "History depth: {}", self.history_depth)?;
        write!(f, "{}", self.status_label)
    }
}

/// Parses script text.
pub fn parse_script(text: &str) -> Result<Vec<ReplayEvent>, serde_json::Error> {
    serde_json::from_str(text)
}

/// Reads and parses a script file.
pub fn load_script(path: &Path) -> Result<Vec<ReplayEvent>, ReplayError> {
    let text = fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let events = parse_script(&text).map_err(|source| ReplayError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Loaded {} events from {}", events.len(), path.display());
    Ok(events)
}

/// Drives `session` through `events`, settling redraws after each one.
pub async fn run(
    session: &mut DrawingSession,
    events: &[ReplayEvent],
) -> Result<ReplaySummary, ReplayError> {
    let mut player = Player::default();
    for (index, event) in events.iter().enumerate() {
        player.apply(session, index, event)?;
        session
            .settle()
            .await
            .map_err(|source| ReplayError::Surface { index, source })?;
    }

    Ok(ReplaySummary {
        events_applied: events.len(),
        strokes: player.strokes,
        history_depth: session.history().undo_depth(),
        status_label: session.status_label(),
    })
}

#[derive(Debug, Default)]
struct Player {
    last_position: Option<(f64, f64)>,
    buttons: u16,
    strokes: Vec<Recognition>,
}

impl Player {
    fn apply(
        &mut self,
        session: &mut DrawingSession,
        index: usize,
        event: &ReplayEvent,
    ) -> Result<(), ReplayError> {
        let surface = |source| ReplayError::Surface { index, source };

        match event {
            ReplayEvent::Down {
                x,
                y,
                buttons,
                source,
            } => {
                self.track(*x, *y);
                self.buttons = *buttons;
                let pointer = PointerEvent::new(*x, *y)
                    .with_buttons(*buttons)
                    .with_source(*source);
                session.on_pointer_down(&pointer).map_err(surface)?;
            }
            ReplayEvent::Move { x, y, dx, dy } => {
                let (last_x, last_y) = self.last_position.unwrap_or((*x, *y));
                let movement_x = dx.unwrap_or(x - last_x);
                let movement_y = dy.unwrap_or(y - last_y);
                self.track(*x, *y);
                let pointer = PointerEvent::new(*x, *y)
                    .with_buttons(self.buttons)
                    .with_movement(movement_x, movement_y);
                session.on_pointer_move(&pointer).map_err(surface)?;
            }
            ReplayEvent::Up { x, y } => {
                self.track(*x, *y);
                let finished = session
                    .on_pointer_up(&PointerEvent::new(*x, *y))
                    .map_err(surface)?;
                self.record(finished);
            }
            ReplayEvent::Leave { x, y } => {
                self.track(*x, *y);
                let finished = session
                    .on_pointer_leave(&PointerEvent::new(*x, *y))
                    .map_err(surface)?;
                self.record(finished);
            }
            ReplayEvent::Wheel { x, y, delta_y } => {
                session.on_wheel(*x, *y, *delta_y);
            }
            ReplayEvent::Key { combo } => {
                let binding = KeyBinding::parse(combo)
                    .map_err(|message| ReplayError::Key { index, message })?;
                let modifiers = Modifiers {
                    shift: binding.shift,
                    ctrl: binding.ctrl,
                    alt: binding.alt,
                };
                if !session.on_key_press(Key::from_name(&binding.key), modifiers) {
                    log::debug!("Event {}: '{}' is not bound", index, combo);
                }
            }
            ReplayEvent::Color { value } => {
                session
                    .set_color(value)
                    .map_err(|source| ReplayError::Color { index, source })?;
            }
            ReplayEvent::LineWidth { value } => session.set_line_width(*value),
            ReplayEvent::Tool { tool } => session.select_tool(*tool),
            ReplayEvent::Text {
                x,
                y,
                text,
                color,
                size,
            } => {
                let color = color
                    .as_deref()
                    .map(Color::from_hex)
                    .transpose()
                    .map_err(|source| ReplayError::Color { index, source })?;
                let commit = TextCommit {
                    color,
                    font_size: *size,
                    ..TextCommit::new(*x, *y, text.clone())
                };
                session.commit_text(&commit).map_err(surface)?;
            }
            ReplayEvent::Clear => session.clear().map_err(surface)?,
            ReplayEvent::Undo => {
                session.undo();
            }
            ReplayEvent::Redo => {
                session.redo();
            }
            ReplayEvent::DarkMode => {
                session.toggle_dark_mode();
            }
        }
        Ok(())
    }

    fn track(&mut self, x: f64, y: f64) {
        self.last_position = Some((x, y));
    }

    fn record(&mut self, finished: Option<Recognition>) {
        if let Some(recognition) = finished {
            self.strokes.push(recognition);
        }
        self.buttons = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn session() -> DrawingSession {
        DrawingSession::new(
            &Config::default(),
            200,
            200,
            1.0,
            &tokio::runtime::Handle::current(),
        )
        .unwrap()
    }

    fn line(from: (f64, f64), to: (f64, f64), steps: usize) -> Vec<ReplayEvent> {
        let mut events = vec![ReplayEvent::Down {
            x: from.0,
            y: from.1,
            buttons: PRIMARY_BUTTON_MASK,
            source: PointerSource::Mouse,
        }];
        for i in 1..=steps {
            let t = i as f64 / steps as f64;
            events.push(ReplayEvent::Move {
                x: from.0 + (to.0 - from.0) * t,
                y: from.1 + (to.1 - from.1) * t,
                dx: None,
                dy: None,
            });
        }
        events.push(ReplayEvent::Up { x: to.0, y: to.1 });
        events
    }

    #[test]
    fn parses_tagged_events() {
        let events = parse_script(
            r##"[
                {"type": "down", "x": 1, "y": 2},
                {"type": "move", "x": 3, "y": 4, "dx": 2},
                {"type": "line_width", "value": 7},
                {"type": "tool", "tool": "eraser"},
                {"type": "text", "x": 5, "y": 6, "text": "hi", "color": "#f00"},
                {"type": "dark_mode"}
            ]"##,
        )
        .unwrap();

        assert_eq!(events.len(), 6);
        assert_eq!(
            events[0],
            ReplayEvent::Down {
                x: 1.0,
                y: 2.0,
                buttons: PRIMARY_BUTTON_MASK,
                source: PointerSource::Mouse
            }
        );
        assert_eq!(
            events[1],
            ReplayEvent::Move {
                x: 3.0,
                y: 4.0,
                dx: Some(2.0),
                dy: None
            }
        );
        assert_eq!(
            events[3],
            ReplayEvent::Tool {
                tool: Tool::Eraser
            }
        );
        assert_eq!(events[5], ReplayEvent::DarkMode);
    }

    #[test]
    fn rejects_unknown_event_type() {
        assert!(parse_script(r#"[{"type": "teleport"}]"#).is_err());
    }

    #[test]
    fn missing_script_reports_path() {
        let err = load_script(Path::new("/nonexistent/inkboard/script.json")).unwrap_err();
        assert!(matches!(err, ReplayError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/inkboard/script.json"));
    }

    #[tokio::test]
    async fn replays_strokes_and_undo() {
        let mut session = session();
        let mut events = line((10.0, 50.0), (150.0, 60.0), 20);
        events.extend(line((10.0, 120.0), (60.0, 180.0), 5));
        events.push(ReplayEvent::Key {
            combo: "Ctrl+Z".into(),
        });

        let summary = run(&mut session, &events).await.unwrap();
        assert_eq!(summary.events_applied, events.len());
        assert_eq!(summary.strokes.len(), 2);
        assert_eq!(summary.history_depth, 2);
        assert_eq!(summary.status_label, "Zoom: 100%, Pan: (0, 0)");
    }

    #[tokio::test]
    async fn middle_drag_pans_from_positions() {
        let mut session = session();
        let events = vec![
            ReplayEvent::Down {
                x: 50.0,
                y: 50.0,
                buttons: 4,
                source: PointerSource::Mouse,
            },
            ReplayEvent::Move {
                x: 70.0,
                y: 40.0,
                dx: None,
                dy: None,
            },
            ReplayEvent::Up { x: 70.0, y: 40.0 },
        ];

        let summary = run(&mut session, &events).await.unwrap();
        assert!(summary.strokes.is_empty());
        assert_eq!(session.viewport().pan(), (20.0, -10.0));
        assert_eq!(summary.status_label, "Zoom: 100%, Pan: (20, -10)");
    }

    #[tokio::test]
    async fn bad_color_names_the_event() {
        let mut session = session();
        let events = vec![
            ReplayEvent::Undo,
            ReplayEvent::Color {
                value: "mauve-ish".into(),
            },
        ];
        let err = run(&mut session, &events).await.unwrap_err();
        assert!(matches!(err, ReplayError::Color { index: 1, .. }));
    }
}
