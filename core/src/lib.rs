//! # Terrasculpt Core
//!
//! Editor-independent core of the Terrasculpt terrain tools: the undo/redo
//! action log that brushes and shortcut handlers drive.

pub mod action_log;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Logs the core version once the host has installed a logger.
pub fn init() {
    log::info!("Terrasculpt Core v{} initialized", VERSION);
}
