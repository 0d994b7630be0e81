//! Three-row layout of the goal tree: root on top, mid goals evenly spaced
//! on the middle row, low goals grouped under their mid goal.

mod engine;
mod placement;
mod types;

pub use engine::LayoutEngine;
pub use placement::{child_x, row_x};
pub use types::{Layout, Placement, Position};

use crate::tree::GoalTree;

/// Lay out the tree with the default row heights.
pub fn layout(tree: &GoalTree) -> Layout {
    LayoutEngine::default().layout(tree)
}
