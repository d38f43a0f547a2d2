//! Host shell: owns the action log and hands it to the tools.

use std::cell::RefCell;
use std::rc::Rc;

use terrasculpt_core::action_log::ActionLog;

use crate::brush::{BrushSettings, BrushTool};
use crate::heightfield::Heightfield;
use crate::shortcuts::ShortcutHandler;

/// Constructs the single [`ActionLog`] of a session and injects it into
/// every collaborator that records or replays edits.
pub struct SculptShell {
    log: Rc<RefCell<ActionLog>>,
    terrain: Rc<RefCell<Heightfield>>,
}

impl SculptShell {
    pub fn new(width: usize, depth: usize) -> Self {
        log::info!("Creating sculpt session ({width}x{depth})");
        Self {
            log: Rc::new(RefCell::new(ActionLog::new())),
            terrain: Rc::new(RefCell::new(Heightfield::new(width, depth))),
        }
    }

    pub fn brush(&self, settings: BrushSettings) -> BrushTool {
        BrushTool::new(Rc::clone(&self.log), Rc::clone(&self.terrain), settings)
    }

    pub fn shortcuts(&self) -> ShortcutHandler {
        ShortcutHandler::new(Rc::clone(&self.log))
    }

    pub fn log(&self) -> &Rc<RefCell<ActionLog>> {
        &self.log
    }

    pub fn terrain(&self) -> &Rc<RefCell<Heightfield>> {
        &self.terrain
    }
}
