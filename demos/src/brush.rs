//! Sculpting brush that records each stroke as one undoable action.
//!
//! The brush edits the heightfield directly, then records closures that
//! restore the before/after snapshots. The snapshots themselves are held by
//! the action log; the closures only keep weak references to them.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use terrasculpt_core::action_log::{
    ActionLog, ActionLogError, ActionLogResult, OperationError, OperationResult,
};

use crate::heightfield::{CellXZ, Heightfield};

/// Shape of the brush footprint
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BrushShape {
    /// Square brush
    Square,
    /// Circular brush
    #[default]
    Round,
}

/// Brush parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrushSettings {
    /// Radius in cells around the stroke center.
    pub radius: usize,
    /// Height added to every cell in the footprint (negative lowers).
    pub strength: f32,
    pub shape: BrushShape,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            radius: 1,
            strength: 1.0,
            shape: BrushShape::Round,
        }
    }
}

type Snapshot = Vec<(CellXZ, f32)>;

/// Raises or lowers terrain and records each stroke in the injected log.
pub struct BrushTool {
    log: Rc<RefCell<ActionLog>>,
    terrain: Rc<RefCell<Heightfield>>,
    settings: BrushSettings,
}

impl BrushTool {
    pub fn new(
        log: Rc<RefCell<ActionLog>>,
        terrain: Rc<RefCell<Heightfield>>,
        settings: BrushSettings,
    ) -> Self {
        Self {
            log,
            terrain,
            settings,
        }
    }

    pub fn settings(&self) -> BrushSettings {
        self.settings
    }

    /// Cells covered by a stroke centered on `center`, clipped to the grid.
    pub fn footprint(&self, center: CellXZ) -> Vec<CellXZ> {
        let terrain = self.terrain.borrow();
        if terrain.width() == 0 || terrain.depth() == 0 {
            return Vec::new();
        }
        let r = self.settings.radius;
        let x_range = center.x.saturating_sub(r)..=center.x.saturating_add(r).min(terrain.width() - 1);
        let z_range = center.z.saturating_sub(r)..=center.z.saturating_add(r).min(terrain.depth() - 1);

        let mut cells = Vec::new();
        for z in z_range {
            for x in x_range.clone() {
                if self.settings.shape == BrushShape::Round {
                    let dx = x.abs_diff(center.x);
                    let dz = z.abs_diff(center.z);
                    let distance_sq = dx.saturating_mul(dx).saturating_add(dz.saturating_mul(dz));
                    if distance_sq > r.saturating_mul(r) {
                        continue;
                    }
                }
                cells.push(CellXZ::new(x, z));
            }
        }
        cells
    }

    /// Applies one stroke and commits it as a single action.
    ///
    /// Returns the number of cells touched. A stroke entirely outside the
    /// grid records nothing.
    pub fn stroke(&self, center: CellXZ) -> ActionLogResult<usize> {
        let cells = self.footprint(center);
        if cells.is_empty() {
            log::debug!("stroke at {center:?} misses the terrain");
            return Ok(0);
        }

        let mut history = self.log.borrow_mut();
        history.create_action(format!("Sculpt ({}, {})", center.x, center.z))?;

        let was_dirty = self.terrain.borrow().is_dirty();
        history.add_undo_property_set(&self.terrain, "dirty", was_dirty)?;
        history.add_do_property_set(&self.terrain, "dirty", true)?;

        let (before, after) = match self.edit(&cells) {
            Ok(snapshots) => snapshots,
            Err(source) => {
                let action = history.discard_action()?;
                return Err(ActionLogError::OperationFailed { action, source });
            }
        };

        let before = Rc::new(before);
        let after = Rc::new(after);
        history.add_do_operation(restore(Rc::downgrade(&self.terrain), Rc::downgrade(&after)))?;
        history.add_undo_operation(restore(
            Rc::downgrade(&self.terrain),
            Rc::downgrade(&before),
        ))?;
        history.add_undo_held_object(before)?;
        history.add_do_held_object(after)?;
        // The heights are already edited; redoing the restore is a no-op
        // and the do-side property set marks the terrain dirty.
        history.commit_action(true)?;
        Ok(cells.len())
    }

    /// Raises `cells` by the brush strength and returns (before, after) snapshots.
    fn edit(&self, cells: &[CellXZ]) -> OperationResult<(Snapshot, Snapshot)> {
        let mut terrain = self.terrain.borrow_mut();
        let mut before = Vec::with_capacity(cells.len());
        let mut after = Vec::with_capacity(cells.len());
        for &cell in cells {
            let old = terrain
                .height(cell)
                .ok_or_else(|| OperationError::TargetNotFound(format!("cell {cell:?}")))?;
            let new = old + self.settings.strength;
            terrain.set_height(cell, new)?;
            before.push((cell, old));
            after.push((cell, new));
        }
        Ok((before, after))
    }
}

/// Builds an operation that writes `snapshot` back into `terrain`.
fn restore(
    terrain: Weak<RefCell<Heightfield>>,
    snapshot: Weak<Snapshot>,
) -> impl FnMut() -> OperationResult + 'static {
    move || {
        let terrain = terrain
            .upgrade()
            .ok_or_else(|| OperationError::TargetNotFound("heightfield".into()))?;
        let snapshot = snapshot
            .upgrade()
            .ok_or_else(|| OperationError::TargetNotFound("stroke snapshot".into()))?;
        let mut terrain = terrain.borrow_mut();
        for &(cell, height) in snapshot.iter() {
            terrain.set_height(cell, height)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(settings: BrushSettings) -> (Rc<RefCell<ActionLog>>, Rc<RefCell<Heightfield>>, BrushTool) {
        let log = Rc::new(RefCell::new(ActionLog::new()));
        let terrain = Rc::new(RefCell::new(Heightfield::new(5, 5)));
        let brush = BrushTool::new(Rc::clone(&log), Rc::clone(&terrain), settings);
        (log, terrain, brush)
    }

    #[test]
    fn round_footprint_excludes_corners() {
        let (_, _, brush) = setup(BrushSettings::default());
        let cells = brush.footprint(CellXZ::new(2, 2));
        assert_eq!(cells.len(), 5);
        assert!(!cells.contains(&CellXZ::new(1, 1)));
    }

    #[test]
    fn square_footprint_is_clipped() {
        let (_, _, brush) = setup(BrushSettings {
            shape: BrushShape::Square,
            ..BrushSettings::default()
        });
        assert_eq!(brush.footprint(CellXZ::new(2, 2)).len(), 9);
        assert_eq!(brush.footprint(CellXZ::new(0, 0)).len(), 4);
        assert!(brush.footprint(CellXZ::new(10, 10)).is_empty());
    }

    #[test]
    fn huge_radius_is_clipped() {
        for shape in [BrushShape::Round, BrushShape::Square] {
            let (_, _, brush) = setup(BrushSettings {
                radius: usize::MAX,
                shape,
                ..BrushSettings::default()
            });
            assert_eq!(brush.footprint(CellXZ::new(2, 2)).len(), 25);
            assert_eq!(brush.footprint(CellXZ::new(usize::MAX, usize::MAX)).len(), 25);
        }
    }

    #[test]
    fn center_near_usize_max_misses_the_grid() {
        let (_, _, brush) = setup(BrushSettings::default());
        assert!(brush.footprint(CellXZ::new(usize::MAX, 2)).is_empty());
        assert!(brush.footprint(CellXZ::new(2, usize::MAX)).is_empty());
    }

    #[test]
    fn stroke_records_one_action() {
        let (log, terrain, brush) = setup(BrushSettings::default());
        assert!(!terrain.borrow().is_dirty());
        assert_eq!(brush.stroke(CellXZ::new(2, 2)), Ok(5));
        assert_eq!(terrain.borrow().total_height(), 5.0);
        assert!(terrain.borrow().is_dirty());
        assert_eq!(log.borrow().undo_name(), Some("Sculpt (2, 2)"));
    }

    #[test]
    fn undo_and_redo_restore_snapshots() {
        let (log, terrain, brush) = setup(BrushSettings::default());
        brush.stroke(CellXZ::new(2, 2)).unwrap();
        brush.stroke(CellXZ::new(2, 3)).unwrap();
        let sculpted = terrain.borrow().total_height();

        assert_eq!(log.borrow_mut().undo(), Ok(true));
        assert_eq!(log.borrow_mut().undo(), Ok(true));
        assert_eq!(terrain.borrow().total_height(), 0.0);
        assert!(!terrain.borrow().is_dirty());

        assert_eq!(log.borrow_mut().redo(), Ok(true));
        assert_eq!(log.borrow_mut().redo(), Ok(true));
        assert_eq!(terrain.borrow().total_height(), sculpted);
        assert!(terrain.borrow().is_dirty());
    }

    #[test]
    fn missed_stroke_records_nothing() {
        let (log, _, brush) = setup(BrushSettings::default());
        assert_eq!(brush.stroke(CellXZ::new(50, 50)), Ok(0));
        assert!(!log.borrow().has_undo());
    }

    #[test]
    fn stroke_while_action_pending_is_rejected() {
        let (log, terrain, brush) = setup(BrushSettings::default());
        log.borrow_mut().create_action("Manual").unwrap();
        assert!(matches!(
            brush.stroke(CellXZ::new(1, 1)),
            Err(ActionLogError::PendingActionOverwritten { .. })
        ));
        assert_eq!(terrain.borrow().total_height(), 0.0);
    }

    #[test]
    fn undo_fails_cleanly_once_terrain_is_gone() {
        let (log, terrain, brush) = setup(BrushSettings::default());
        brush.stroke(CellXZ::new(2, 2)).unwrap();
        drop(brush);
        drop(terrain);

        let err = log.borrow_mut().undo().unwrap_err();
        assert!(matches!(
            err,
            ActionLogError::OperationFailed {
                source: OperationError::TargetNotFound(_),
                ..
            }
        ));
        assert_eq!(log.borrow().redo_count(), 1);
    }
}
