//! Data structures for layout computation.

use crate::tree::{GoalTree, NodeId};
use serde::Serialize;

/// Normalized coordinates in [0,1]x[0,1]. y = 1.0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The complete layout result: one position per tree node, indexed by handle.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub(crate) positions: Vec<Position>,
}

impl Layout {
    pub fn position(&self, id: NodeId) -> Position {
        self.positions[id.index()]
    }

    /// Position of the node with the given display id.
    pub fn get(&self, tree: &GoalTree, id: &str) -> Option<Position> {
        tree.find(id).map(|h| self.position(h))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Per-node report joining the tree with its positions.
    pub fn placements<'a>(&'a self, tree: &'a GoalTree) -> Vec<Placement<'a>> {
        tree.nodes()
            .map(|(h, n)| Placement {
                id: &n.id,
                label: &n.label,
                level: n.level.as_str(),
                x: self.positions[h.index()].x,
                y: self.positions[h.index()].y,
            })
            .collect()
    }
}

/// A positioned node, serialized for the JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct Placement<'a> {
    pub id: &'a str,
    pub label: &'a str,
    pub level: &'a str,
    pub x: f64,
    pub y: f64,
}
