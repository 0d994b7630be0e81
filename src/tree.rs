use crate::assignment::GoalAssignment;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    High,
    Mid,
    Low,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Mid => "mid",
            Self::Low => "low",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "high" => Some(Self::High),
            "mid" => Some(Self::Mid),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Arena handle of a node. Assigned in creation order, the root is always 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct GoalNode {
    /// Display id: `H`, `M{i}` or `L{i}{j}`.
    pub id: String,
    pub label: String,
    pub level: Level,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Position among siblings (for mid nodes, the mid goal index).
    pub slot: usize,
}

/// Directed edge from a child to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("low goals assigned to mid goal #{index}, but only {mid_count} mid goals exist")]
    MidIndexOutOfRange { index: usize, mid_count: usize },
}

/// Three-level goal hierarchy: one high root, mid children, low grandchildren.
#[derive(Debug, Clone)]
pub struct GoalTree {
    nodes: Vec<GoalNode>,
}

impl GoalTree {
    pub fn build(assignment: &GoalAssignment) -> Result<Self, BuildError> {
        let mid_count = assignment.mid_goals.len();
        if let Some((&index, _)) = assignment
            .low_goals_by_mid_index
            .iter()
            .find(|(i, lows)| **i >= mid_count && !lows.is_empty())
        {
            return Err(BuildError::MidIndexOutOfRange { index, mid_count });
        }

        let mut tree = GoalTree { nodes: Vec::new() };
        let root = tree.push("H".to_string(), &assignment.high_goal, Level::High, None, 0);

        for (i, mid_goal) in assignment.mid_goals.iter().enumerate() {
            let mid = tree.push(format!("M{i}"), mid_goal, Level::Mid, Some(root), i);
            for (j, low_goal) in assignment.low_goals_for(i).iter().enumerate() {
                tree.push(format!("L{i}{j}"), low_goal, Level::Low, Some(mid), j);
            }
        }

        log::debug!(
            "built goal tree: {} nodes, {} edges, {} unassigned low goals left out",
            tree.len(),
            tree.len() - 1,
            assignment.unassigned_low_goals().len()
        );

        Ok(tree)
    }

    fn push(
        &mut self,
        id: String,
        label: &str,
        level: Level,
        parent: Option<NodeId>,
        slot: usize,
    ) -> NodeId {
        let handle = NodeId(self.nodes.len());
        self.nodes.push(GoalNode {
            id,
            label: label.to_string(),
            level,
            parent,
            children: Vec::new(),
            slot,
        });
        if let Some(p) = parent {
            self.nodes[p.0].children.push(handle);
        }
        handle
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &GoalNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &GoalNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Mid nodes in mid goal order.
    pub fn mids(&self) -> &[NodeId] {
        self.children(self.root())
    }

    /// One child -> parent edge per non-root node, in node order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> {
        self.nodes()
            .filter_map(|(id, n)| n.parent.map(|to| Edge { from: id, to }))
    }

    /// Look up a node by display id.
    pub fn find(&self, id: &str) -> Option<NodeId> {
        self.nodes().find(|(_, n)| n.id == id).map(|(h, _)| h)
    }
}

/// Build the goal tree for an assignment.
pub fn build_tree(assignment: &GoalAssignment) -> Result<GoalTree, BuildError> {
    GoalTree::build(assignment)
}
