//! # Terrasculpt Demos
//!
//! Demo sessions that drive the Terrasculpt action log the way an editor
//! plugin would.
//!
//! ## Available Demos
//!
//! - `sculpt_session_demo` - Brush strokes on a toy heightfield, walked
//!   back and forth with undo/redo shortcuts

pub mod brush;
pub mod heightfield;
pub mod shell;
pub mod shortcuts;

/// Demos library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
