//! Input handling and the drawing session state machine.
//!
//! Embedders translate their native pointer, wheel and keyboard events into
//! the generic types in [`events`] and feed them to a [`DrawingSession`],
//! which owns the tool state, drawing parameters (color, line width) and the
//! idle/drawing/panning gesture machine.

pub mod events;
pub mod modifiers;
pub mod session;
pub mod tool;

// Re-export commonly used types at module level
pub use events::{Key, MIDDLE_BUTTON_MASK, PRIMARY_BUTTON_MASK, PointerEvent, PointerSource};
pub use modifiers::Modifiers;
pub use session::{
    DrawingSession, GestureState, MAX_LINE_WIDTH, MIN_LINE_WIDTH, SessionState, TextCommit,
};
pub use tool::Tool;
