//! Keyboard shortcuts that walk the action log.

use std::cell::RefCell;
use std::rc::Rc;

use terrasculpt_core::action_log::ActionLog;

/// History shortcut resolved from a key chord.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    Undo,
    Redo,
}

impl Shortcut {
    /// Ctrl+Z undoes; Ctrl+Y and Ctrl+Shift+Z redo.
    pub fn from_chord(ctrl: bool, shift: bool, key: char) -> Option<Self> {
        if !ctrl {
            return None;
        }
        match key.to_ascii_lowercase() {
            'z' if shift => Some(Self::Redo),
            'z' => Some(Self::Undo),
            'y' => Some(Self::Redo),
            _ => None,
        }
    }
}

/// Forwards shortcuts to the injected action log.
pub struct ShortcutHandler {
    log: Rc<RefCell<ActionLog>>,
}

impl ShortcutHandler {
    pub fn new(log: Rc<RefCell<ActionLog>>) -> Self {
        Self { log }
    }

    /// Runs `shortcut`. Returns `true` if the history moved.
    ///
    /// Failures of recorded operations are logged, not propagated: the
    /// keyboard layer has nobody to report them to.
    pub fn handle(&self, shortcut: Shortcut) -> bool {
        let mut history = self.log.borrow_mut();
        let result = match shortcut {
            Shortcut::Undo => history.undo(),
            Shortcut::Redo => history.redo(),
        };
        match result {
            Ok(moved) => moved,
            Err(e) => {
                log::warn!("{shortcut:?} failed: {e}");
                // The action already changed stacks.
                true
            }
        }
    }
}
