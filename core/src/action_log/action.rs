//! Actions: named bundles of recorded undo and do steps.
//!
//! Each [`Action`] keeps two independent [`Steps`] lists, one for the undo
//! direction and one for the do (redo) direction. Running a direction
//! executes its operations in append order, then applies its property sets
//! in append order.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use super::error::{ActionLogError, ActionLogResult, OperationResult};
use super::property::PropertySet;

/// A recorded, deferred step. Runs for its side effect only.
pub type Operation = Box<dyn FnMut() -> OperationResult>;

/// A shared-ownership hold on an externally owned object.
pub type HeldObject = Rc<dyn Any>;

/// Which side of an action a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Undo,
    Do,
}

#[derive(Default)]
pub(crate) struct Steps {
    operations: Vec<Operation>,
    property_sets: Vec<PropertySet>,
    held_objects: Vec<HeldObject>,
}

impl Steps {
    pub(crate) fn push_operation(&mut self, op: Operation) {
        self.operations.push(op);
    }

    pub(crate) fn push_property_set(&mut self, set: PropertySet) {
        self.property_sets.push(set);
    }

    /// Holds `object` until the steps are dropped.
    ///
    /// Returns `false` if the same allocation is already held.
    pub(crate) fn hold(&mut self, object: HeldObject) -> bool {
        if self.held_objects.iter().any(|h| Rc::ptr_eq(h, &object)) {
            return false;
        }
        self.held_objects.push(object);
        true
    }

    /// Runs every operation, then every property set. Stops at the first failure.
    fn run(&mut self, action: &str) -> ActionLogResult {
        for op in &mut self.operations {
            op().map_err(|source| ActionLogError::OperationFailed {
                action: action.to_owned(),
                source,
            })?;
        }
        for set in &self.property_sets {
            set.apply(action)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Steps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Steps")
            .field("operations", &self.operations.len())
            .field("property_sets", &self.property_sets)
            .field("held_objects", &self.held_objects.len())
            .finish()
    }
}

/// One atomic, named unit of reversible work.
#[derive(Debug)]
pub(crate) struct Action {
    name: String,
    undo_steps: Steps,
    do_steps: Steps,
}

impl Action {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            undo_steps: Steps::default(),
            do_steps: Steps::default(),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn steps_mut(&mut self, direction: Direction) -> &mut Steps {
        match direction {
            Direction::Undo => &mut self.undo_steps,
            Direction::Do => &mut self.do_steps,
        }
    }

    /// Runs the steps recorded for `direction`.
    pub(crate) fn run(&mut self, direction: Direction) -> ActionLogResult {
        let steps = match direction {
            Direction::Undo => &mut self.undo_steps,
            Direction::Do => &mut self.do_steps,
        };
        steps.run(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::action_log::error::OperationError;
    use crate::action_log::property::{PropertyTarget, PropertyType, PropertyValue};

    /// Records every event in order so tests can check sequencing.
    #[derive(Default)]
    struct Journal {
        entries: Vec<String>,
    }

    impl PropertyTarget for Journal {
        fn property_type(&self, property: &str) -> Option<PropertyType> {
            (property == "marker").then_some(PropertyType::Str)
        }

        fn set_property(&mut self, _property: &str, value: PropertyValue) -> OperationResult {
            self.entries
                .push(format!("set:{}", value.as_str().unwrap_or_default()));
            Ok(())
        }
    }

    fn log_op(journal: &Rc<RefCell<Journal>>, entry: &'static str) -> Operation {
        let journal = Rc::clone(journal);
        Box::new(move || {
            journal.borrow_mut().entries.push(entry.into());
            Ok(())
        })
    }

    #[test]
    fn operations_run_before_property_sets() {
        let journal = Rc::new(RefCell::new(Journal::default()));
        let mut action = Action::new("Raise".into());
        let steps = action.steps_mut(Direction::Do);
        steps.push_property_set(PropertySet::new(&journal, "marker".into(), "p1".into()));
        steps.push_operation(log_op(&journal, "op1"));
        steps.push_property_set(PropertySet::new(&journal, "marker".into(), "p2".into()));
        steps.push_operation(log_op(&journal, "op2"));

        action.run(Direction::Do).unwrap();
        assert_eq!(
            journal.borrow().entries,
            vec!["op1", "op2", "set:p1", "set:p2"]
        );
    }

    #[test]
    fn directions_are_independent() {
        let journal = Rc::new(RefCell::new(Journal::default()));
        let mut action = Action::new("Raise".into());
        action
            .steps_mut(Direction::Do)
            .push_operation(log_op(&journal, "do"));
        action
            .steps_mut(Direction::Undo)
            .push_operation(log_op(&journal, "undo"));

        action.run(Direction::Undo).unwrap();
        assert_eq!(journal.borrow().entries, vec!["undo"]);
        action.run(Direction::Do).unwrap();
        assert_eq!(journal.borrow().entries, vec!["undo", "do"]);
    }

    #[test]
    fn failing_operation_stops_the_run() {
        let journal = Rc::new(RefCell::new(Journal::default()));
        let mut action = Action::new("Flatten".into());
        let steps = action.steps_mut(Direction::Do);
        steps.push_operation(log_op(&journal, "first"));
        steps.push_operation(Box::new(|| -> OperationResult {
            Err(OperationError::Custom("mesh locked".into()))
        }));
        steps.push_operation(log_op(&journal, "never"));

        let err = action.run(Direction::Do).unwrap_err();
        assert_eq!(
            err,
            ActionLogError::OperationFailed {
                action: "Flatten".into(),
                source: OperationError::Custom("mesh locked".into()),
            }
        );
        assert_eq!(journal.borrow().entries, vec!["first"]);
    }

    #[test]
    fn hold_deduplicates_by_identity() {
        let mesh = Rc::new(vec![0u8; 4]);
        let other = Rc::new(vec![0u8; 4]);
        let mut steps = Steps::default();
        assert!(steps.hold(mesh.clone()));
        assert!(!steps.hold(mesh.clone()));
        assert!(steps.hold(other.clone()));
        assert_eq!(Rc::strong_count(&mesh), 2);
        assert_eq!(Rc::strong_count(&other), 2);

        drop(steps);
        assert_eq!(Rc::strong_count(&mesh), 1);
        assert_eq!(Rc::strong_count(&other), 1);
    }

    #[test]
    fn operations_can_be_rerun() {
        let count = Rc::new(RefCell::new(0));
        let mut action = Action::new("Paint".into());
        let c = Rc::clone(&count);
        action
            .steps_mut(Direction::Do)
            .push_operation(Box::new(move || {
                *c.borrow_mut() += 1;
                Ok(())
            }));
        action.run(Direction::Do).unwrap();
        action.run(Direction::Do).unwrap();
        assert_eq!(*count.borrow(), 2);
        assert_eq!(action.name(), "Paint");
    }
}
