//! Undo/redo action log for terrain edits.
//!
//! This module implements the transactional history that editor tools
//! drive while sculpting. It knows nothing about terrain: every edit is
//! recorded as closures and property snapshots that the log replays.
//!
//! - [`ActionLog`] — the pending action plus the undo and redo stacks
//! - [`PropertyTarget`] / [`PropertyValue`] — typed property assignment
//! - [`ActionLogError`] / [`OperationError`] — error handling
//!
//! # Recording an edit
//!
//! A tool opens an action with [`ActionLog::create_action`], records the
//! steps needed to revert and to reapply the edit, and finishes with
//! [`ActionLog::commit_action`]. Within one direction, operations always
//! run before property sets, and both run in the order they were added.
//!
//! # Misuse
//!
//! Appending or committing with nothing pending, or opening a second
//! action while one is pending, is reported through `log::warn!` and an
//! `Err`; the log's state is left unchanged. Opening a second action is
//! rejected rather than silently replacing the first, so a half-built
//! action is never lost.

mod action;
mod error;
mod history;
mod property;

pub use action::{HeldObject, Operation};
pub use error::{ActionLogError, ActionLogResult, OperationError, OperationResult};
pub use history::ActionLog;
pub use property::{OpaqueHandle, PropertyTarget, PropertyType, PropertyValue};
