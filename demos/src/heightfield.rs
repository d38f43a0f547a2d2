//! Toy heightfield used as the sculpting target in demos.

use terrasculpt_core::action_log::{
    OperationError, OperationResult, PropertyTarget, PropertyType, PropertyValue,
};

/// A 2D cell position on the terrain (XZ plane).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellXZ {
    pub x: usize,
    pub z: usize,
}

impl CellXZ {
    pub fn new(x: usize, z: usize) -> Self {
        Self { x, z }
    }
}

/// Row-major grid of heights with a "dirty" sentinel for change detection.
#[derive(Debug, Clone)]
pub struct Heightfield {
    width: usize,
    depth: usize,
    heights: Vec<f32>,
    dirty: bool,
}

impl Heightfield {
    /// Creates a flat heightfield of `width` x `depth` cells.
    pub fn new(width: usize, depth: usize) -> Self {
        Self {
            width,
            depth,
            heights: vec![0.0; width * depth],
            dirty: false,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clears the dirty sentinel, e.g. after the mesh was rebuilt.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn height(&self, cell: CellXZ) -> Option<f32> {
        self.index(cell).map(|i| self.heights[i])
    }

    /// Sets the height of `cell`. Fails if the cell is outside the grid.
    pub fn set_height(&mut self, cell: CellXZ, height: f32) -> OperationResult {
        let i = self
            .index(cell)
            .ok_or_else(|| OperationError::TargetNotFound(format!("cell {cell:?}")))?;
        self.heights[i] = height;
        Ok(())
    }

    /// Sum of all heights; handy for checking round trips.
    pub fn total_height(&self) -> f32 {
        self.heights.iter().sum()
    }

    fn index(&self, cell: CellXZ) -> Option<usize> {
        (cell.x < self.width && cell.z < self.depth).then(|| cell.z * self.width + cell.x)
    }
}

impl PropertyTarget for Heightfield {
    fn property_type(&self, property: &str) -> Option<PropertyType> {
        (property == "dirty").then_some(PropertyType::Bool)
    }

    fn set_property(&mut self, property: &str, value: PropertyValue) -> OperationResult {
        match (property, value) {
            ("dirty", PropertyValue::Bool(dirty)) => {
                self.dirty = dirty;
                Ok(())
            }
            (other, _) => Err(OperationError::TargetNotFound(format!(
                "heightfield property '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_flat_and_clean() {
        let field = Heightfield::new(4, 3);
        assert_eq!(field.width(), 4);
        assert_eq!(field.depth(), 3);
        assert_eq!(field.total_height(), 0.0);
        assert!(!field.is_dirty());
    }

    #[test]
    fn set_height_in_and_out_of_bounds() {
        let mut field = Heightfield::new(2, 2);
        field.set_height(CellXZ::new(1, 1), 2.5).unwrap();
        assert_eq!(field.height(CellXZ::new(1, 1)), Some(2.5));
        assert!(field.set_height(CellXZ::new(2, 0), 1.0).is_err());
        assert_eq!(field.height(CellXZ::new(0, 2)), None);
    }

    #[test]
    fn dirty_is_a_bool_property() {
        let mut field = Heightfield::new(1, 1);
        assert_eq!(field.property_type("dirty"), Some(PropertyType::Bool));
        assert_eq!(field.property_type("height"), None);
        field.set_property("dirty", true.into()).unwrap();
        assert!(field.is_dirty());
        field.mark_clean();
        assert!(!field.is_dirty());
    }
}
