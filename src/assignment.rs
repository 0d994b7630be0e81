use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Shown in place of the tree when there is nothing to draw yet.
pub const RENDER_HINT: &str =
    "Enter a high-level goal and at least one mid-level goal to see the goal tree.";

/// Flat, caller-owned goal input before tree construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalAssignment {
    #[serde(default)]
    pub high_goal: String,
    #[serde(default)]
    pub mid_goals: Vec<String>,
    /// Every low-level goal the user entered, assigned or not.
    #[serde(default)]
    pub low_goals: Vec<String>,
    /// Zero-based mid goal index -> low goals linked to it, in display order.
    #[serde(default)]
    pub low_goals_by_mid_index: BTreeMap<usize, Vec<String>>,
}

impl GoalAssignment {
    pub fn new(high_goal: impl Into<String>) -> Self {
        Self {
            high_goal: high_goal.into(),
            ..Self::default()
        }
    }

    /// Build an assignment from the three text inputs of the goal form.
    /// Mid and low inputs hold one goal per line. The mapping starts empty.
    pub fn from_form(high_goal: &str, mid_text: &str, low_text: &str) -> Self {
        Self {
            high_goal: high_goal.to_string(),
            mid_goals: split_lines(mid_text),
            low_goals: split_lines(low_text),
            low_goals_by_mid_index: BTreeMap::new(),
        }
    }

    pub fn with_mid(mut self, label: impl Into<String>) -> Self {
        self.mid_goals.push(label.into());
        self
    }

    pub fn with_low(mut self, label: impl Into<String>) -> Self {
        self.low_goals.push(label.into());
        self
    }

    /// Replace the low goals linked to the mid goal at `mid_index`.
    pub fn assign<I, S>(&mut self, mid_index: usize, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        self.low_goals_by_mid_index.insert(mid_index, labels);
    }

    pub fn low_goals_for(&self, mid_index: usize) -> &[String] {
        self.low_goals_by_mid_index
            .get(&mid_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Low goals that are linked to some mid goal, in mid order.
    pub fn assigned_low_goals(&self) -> impl Iterator<Item = &str> {
        (0..self.mid_goals.len()).flat_map(move |i| self.low_goals_for(i).iter().map(String::as_str))
    }

    /// Pool entries not linked to any mid goal. These are left out of the tree.
    pub fn unassigned_low_goals(&self) -> Vec<&str> {
        let assigned: HashSet<&str> = self.assigned_low_goals().collect();
        self.low_goals
            .iter()
            .map(String::as_str)
            .filter(|g| !assigned.contains(g))
            .collect()
    }

    /// Whether there is enough input to draw a tree.
    pub fn is_renderable(&self) -> bool {
        !self.high_goal.is_empty() && !self.mid_goals.is_empty()
    }
}

/// Split a multi-line text input into goals, dropping empty lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
