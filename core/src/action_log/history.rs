//! Two-stack undo/redo action log.
//!
//! [`ActionLog`] builds one pending action at a time, commits it onto the
//! undo stack and moves it between the undo and redo stacks on
//! [`undo`](ActionLog::undo) / [`redo`](ActionLog::redo). Committing always
//! clears the redo stack (standard linear undo).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::action::{Action, Direction, HeldObject, Operation};
use super::error::{ActionLogError, ActionLogResult, OperationResult};
use super::property::{PropertySet, PropertyTarget, PropertyValue};

/// Manages a pending action and the undo/redo stacks of committed ones.
///
/// The log is single-threaded: it stores `Rc` handles and non-`Send`
/// closures. Share it between collaborators as `Rc<RefCell<ActionLog>>`.
/// Recorded operations must not call back into the log they are stored in.
///
/// Stack depth is not capped. An action (and every object it holds) is
/// released when a commit clears the redo stack, on [`clear`](Self::clear),
/// or when the log is dropped.
///
/// # Example
///
/// ```ignore
/// let mut log = ActionLog::new();
/// let height = Rc::new(Cell::new(0));
///
/// log.create_action("Raise")?;
/// let h = Rc::clone(&height);
/// log.add_do_operation(move || { h.set(h.get() + 1); Ok(()) })?;
/// let h = Rc::clone(&height);
/// log.add_undo_operation(move || { h.set(h.get() - 1); Ok(()) })?;
/// log.commit_action(true)?;   // height == 1
///
/// log.undo()?;                // height == 0
/// log.redo()?;                // height == 1
/// ```
#[derive(Default)]
pub struct ActionLog {
    pending: Option<Action>,
    undo_stack: Vec<Action>,
    redo_stack: Vec<Action>,
}

impl ActionLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a new pending action named `name`.
    ///
    /// Only one action can be pending. If one already is, the request is
    /// rejected with [`ActionLogError::PendingActionOverwritten`] and the
    /// pending action is left untouched; commit or
    /// [discard](Self::discard_action) it first.
    pub fn create_action(&mut self, name: impl Into<String>) -> ActionLogResult {
        let requested = name.into();
        if let Some(pending) = &self.pending {
            let pending = pending.name().to_owned();
            log::warn!("cannot create action '{requested}': action '{pending}' is still pending");
            return Err(ActionLogError::PendingActionOverwritten { pending, requested });
        }
        log::debug!("creating action '{requested}'");
        self.pending = Some(Action::new(requested));
        Ok(())
    }

    /// Appends an operation to run when the action is undone.
    pub fn add_undo_operation<F>(&mut self, op: F) -> ActionLogResult
    where
        F: FnMut() -> OperationResult + 'static,
    {
        self.push_operation(Direction::Undo, Box::new(op))
    }

    /// Appends an operation to run when the action is done or redone.
    pub fn add_do_operation<F>(&mut self, op: F) -> ActionLogResult
    where
        F: FnMut() -> OperationResult + 'static,
    {
        self.push_operation(Direction::Do, Box::new(op))
    }

    /// Keeps `object` alive for as long as the pending action is in the log.
    ///
    /// Holding the same allocation twice is a no-op.
    pub fn add_undo_held_object(&mut self, object: HeldObject) -> ActionLogResult {
        self.hold(Direction::Undo, object)
    }

    /// Keeps `object` alive for as long as the pending action is in the log.
    ///
    /// Holding the same allocation twice is a no-op.
    pub fn add_do_held_object(&mut self, object: HeldObject) -> ActionLogResult {
        self.hold(Direction::Do, object)
    }

    /// Records `target.property = value` for the undo direction.
    ///
    /// The log keeps only a weak reference to `target`.
    pub fn add_undo_property_set<T: PropertyTarget>(
        &mut self,
        target: &Rc<RefCell<T>>,
        property: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> ActionLogResult {
        let set = PropertySet::new(target, property.into(), value.into());
        self.pending_mut("add_undo_property_set")?
            .steps_mut(Direction::Undo)
            .push_property_set(set);
        Ok(())
    }

    /// Records `target.property = value` for the do direction.
    ///
    /// The log keeps only a weak reference to `target`.
    pub fn add_do_property_set<T: PropertyTarget>(
        &mut self,
        target: &Rc<RefCell<T>>,
        property: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> ActionLogResult {
        let set = PropertySet::new(target, property.into(), value.into());
        self.pending_mut("add_do_property_set")?
            .steps_mut(Direction::Do)
            .push_property_set(set);
        Ok(())
    }

    /// Commits the pending action onto the undo stack and clears the redo stack.
    ///
    /// If `execute` is `true`, the action's do operations and then its do
    /// property sets run immediately. The action is already on the undo
    /// stack when they run, so a failing step leaves the stacks consistent.
    pub fn commit_action(&mut self, execute: bool) -> ActionLogResult {
        let Some(action) = self.pending.take() else {
            log::warn!("commit_action called with no pending action");
            return Err(ActionLogError::NoPendingAction);
        };

        if !self.redo_stack.is_empty() {
            log::debug!("discarding {} redo entries", self.redo_stack.len());
            self.redo_stack.clear();
        }
        log::debug!("committing action '{}'", action.name());
        self.undo_stack.push(action);

        if execute && let Some(action) = self.undo_stack.last_mut() {
            action.run(Direction::Do)?;
        }
        Ok(())
    }

    /// Drops the pending action without committing it.
    ///
    /// Returns the discarded action's name.
    pub fn discard_action(&mut self) -> ActionLogResult<String> {
        let Some(action) = self.pending.take() else {
            log::warn!("discard_action called with no pending action");
            return Err(ActionLogError::NoPendingAction);
        };
        log::debug!("discarding pending action '{}'", action.name());
        Ok(action.name().to_owned())
    }

    /// Undoes the most recently committed (or redone) action.
    ///
    /// Returns `Ok(false)` without side effects if there is nothing to undo.
    /// Otherwise the action moves to the redo stack, then its undo
    /// operations and undo property sets run.
    pub fn undo(&mut self) -> ActionLogResult<bool> {
        let Some(action) = move_top(&mut self.undo_stack, &mut self.redo_stack) else {
            return Ok(false);
        };
        log::debug!("undoing action '{}'", action.name());
        action.run(Direction::Undo)?;
        Ok(true)
    }

    /// Redoes the most recently undone action.
    ///
    /// Returns `Ok(false)` without side effects if there is nothing to redo.
    /// Otherwise the action moves to the undo stack, then its do operations
    /// and do property sets run.
    pub fn redo(&mut self) -> ActionLogResult<bool> {
        let Some(action) = move_top(&mut self.redo_stack, &mut self.undo_stack) else {
            return Ok(false);
        };
        log::debug!("redoing action '{}'", action.name());
        action.run(Direction::Do)?;
        Ok(true)
    }

    /// Returns `true` if there are actions that can be undone.
    pub fn has_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns `true` if there are actions that can be redone.
    pub fn has_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Returns the number of actions in the undo stack.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Returns the number of actions in the redo stack.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Name of the action the next [`undo`](Self::undo) would revert.
    pub fn undo_name(&self) -> Option<&str> {
        self.undo_stack.last().map(Action::name)
    }

    /// Name of the action the next [`redo`](Self::redo) would reapply.
    pub fn redo_name(&self) -> Option<&str> {
        self.redo_stack.last().map(Action::name)
    }

    /// Returns an iterator over undo action names, most recent first.
    pub fn undo_names(&self) -> impl Iterator<Item = &str> {
        self.undo_stack.iter().rev().map(Action::name)
    }

    /// Returns an iterator over redo action names, most recent first.
    pub fn redo_names(&self) -> impl Iterator<Item = &str> {
        self.redo_stack.iter().rev().map(Action::name)
    }

    /// Returns `true` while an action is under construction.
    pub fn is_action_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Name of the action under construction, if any.
    pub fn pending_action_name(&self) -> Option<&str> {
        self.pending.as_ref().map(Action::name)
    }

    /// Drops the pending action and both stacks, releasing every hold.
    pub fn clear(&mut self) {
        self.pending = None;
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn pending_mut(&mut self, caller: &str) -> ActionLogResult<&mut Action> {
        match self.pending.as_mut() {
            Some(action) => Ok(action),
            None => {
                log::warn!("{caller} called with no pending action");
                Err(ActionLogError::NoPendingAction)
            }
        }
    }

    fn push_operation(&mut self, direction: Direction, op: Operation) -> ActionLogResult {
        let caller = match direction {
            Direction::Undo => "add_undo_operation",
            Direction::Do => "add_do_operation",
        };
        self.pending_mut(caller)?
            .steps_mut(direction)
            .push_operation(op);
        Ok(())
    }

    fn hold(&mut self, direction: Direction, object: HeldObject) -> ActionLogResult {
        let caller = match direction {
            Direction::Undo => "add_undo_held_object",
            Direction::Do => "add_do_held_object",
        };
        let action = self.pending_mut(caller)?;
        if action.steps_mut(direction).hold(object) {
            log::trace!("{caller}: holding object for action '{}'", action.name());
        } else {
            log::trace!("{caller}: object already held by action '{}'", action.name());
        }
        Ok(())
    }
}

/// Moves the top action of `from` onto `to` and returns it.
fn move_top<'a>(from: &mut Vec<Action>, to: &'a mut Vec<Action>) -> Option<&'a mut Action> {
    let action = from.pop()?;
    to.push(action);
    to.last_mut()
}

impl fmt::Debug for ActionLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionLog")
            .field("pending", &self.pending_action_name())
            .field("undo_count", &self.undo_stack.len())
            .field("redo_count", &self.redo_stack.len())
            .finish()
    }
}
