//! Layout engine core implementation.

use crate::tree::GoalTree;

use super::placement::{child_x, row_x};
use super::types::{Layout, Position};

/// Layout engine configuration: the y coordinate of each row.
pub struct LayoutEngine {
    pub high_row: f64,
    pub mid_row: f64,
    pub low_row: f64,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self {
            high_row: 1.0,
            mid_row: 0.65,
            low_row: 0.30,
        }
    }
}

impl LayoutEngine {
    /// Compute normalized positions for every node of the tree.
    pub fn layout(&self, tree: &GoalTree) -> Layout {
        let mut positions = vec![Position::new(0.5, self.high_row); tree.len()];

        let mids = tree.mids();
        let mid_count = mids.len();

        for (slot, &mid) in mids.iter().enumerate() {
            positions[mid.index()] = Position::new(row_x(slot, mid_count), self.mid_row);

            let children = tree.children(mid);
            for (j, &low) in children.iter().enumerate() {
                let x = child_x(slot, j, children.len(), mid_count);
                positions[low.index()] = Position::new(x, self.low_row);
            }
        }

        log::debug!(
            "laid out {} nodes across {} mid slots",
            positions.len(),
            mid_count
        );

        Layout { positions }
    }
}
