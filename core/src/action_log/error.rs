//! Error types for the action log and the operations it records.

use thiserror::Error;

use super::property::PropertyType;

/// Failure reported by a recorded operation or a property target.
///
/// Operations are user closures; the log never inspects these values, it
/// only wraps them in [`ActionLogError::OperationFailed`] together with the
/// name of the action that was running.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    /// The object the operation edits no longer exists.
    #[error("target not found: {0}")]
    TargetNotFound(String),
    /// The object is in a state the operation cannot work with.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// A custom error with a description.
    #[error("{0}")]
    Custom(String),
}

/// Result type returned by recorded operations.
pub type OperationResult<T = ()> = Result<T, OperationError>;

/// Errors reported by [`ActionLog`](super::ActionLog).
///
/// Usage errors (`NoPendingAction`, `PendingActionOverwritten`) are also
/// written to the `log` facade at warn level before being returned, so a
/// caller that ignores the result still leaves a trace.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionLogError {
    /// An append, commit or discard was attempted with no action under construction.
    #[error("no action is pending")]
    NoPendingAction,
    /// `create_action` was called while another action was still pending.
    #[error("cannot create action '{requested}': action '{pending}' is still pending")]
    PendingActionOverwritten { pending: String, requested: String },
    /// A recorded operation (or a property target) failed while running.
    #[error("action '{action}' failed: {source}")]
    OperationFailed {
        action: String,
        #[source]
        source: OperationError,
    },
    /// A recorded value does not match the type the target declares.
    #[error("action '{action}': property '{property}' expects {expected}, got {found}")]
    PropertyTypeMismatch {
        action: String,
        property: String,
        expected: PropertyType,
        found: PropertyType,
    },
    /// The target does not declare the recorded property.
    #[error("action '{action}': target has no property '{property}'")]
    UnknownProperty { action: String, property: String },
    /// The target of a property set was dropped by its owner.
    #[error("action '{action}': target of property '{property}' has been dropped")]
    TargetDropped { action: String, property: String },
}

/// Result type for action log operations.
pub type ActionLogResult<T = ()> = Result<T, ActionLogError>;
