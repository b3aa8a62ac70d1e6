//! Library exports for embedding inkboard drawing surfaces.
//!
//! Exposes the drawing session together with the configuration, rendering,
//! recognition and history subsystems it is built from, so that frontends and
//! tools (such as the schema dumper) can share one implementation.

pub mod config;
pub mod draw;
pub mod export;
pub mod history;
pub mod input;
pub mod recognize;
pub mod replay;
pub mod util;
pub mod viewport;

pub use config::Config;
pub use input::DrawingSession;
