// rows.rs — Flat relational form of a goal graph.
//
// `Goals::export` flattens a graph into goal rows, edge rows and settings
// pairs; `Goals::build` turns the same triple back into a graph and refuses
// anything that fails `verify()`. Storage layers (SQLite, files) only ever
// deal in this triple, so the engine stays agnostic of schema versions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::GoalError;
use crate::goal_tree::{GoalId, Goals, ROOT};

/// Settings key holding the current selection.
pub const SELECTION: &str = "selection";

/// Settings key holding the previous selection.
pub const PREVIOUS_SELECTION: &str = "previous_selection";

/// One goal. `name` is `None` for a tombstone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalRow {
    pub goal_id: GoalId,
    pub name: Option<String>,
    pub open: bool,
}

impl GoalRow {
    pub fn new(goal_id: GoalId, name: impl Into<String>, open: bool) -> Self {
        Self {
            goal_id,
            name: Some(name.into()),
            open,
        }
    }
}

/// One dependency: `parent` depends on `child`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRow {
    pub parent: GoalId,
    pub child: GoalId,
}

impl EdgeRow {
    pub fn new(parent: GoalId, child: GoalId) -> Self {
        Self { parent, child }
    }
}

/// The triple produced by `export` and consumed by `build`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphRows {
    pub goals: Vec<GoalRow>,
    pub edges: Vec<EdgeRow>,
    pub settings: Vec<(String, GoalId)>,
}

impl Goals {
    /// Reconstruct a graph from its flat form.
    ///
    /// Ids between 1 and the highest id that have no goal row become
    /// tombstones. `selection` and `previous_selection` default to the root
    /// when absent from `settings`; other keys are ignored. The result must
    /// pass `verify()`, and starts with an empty event log.
    pub fn build(
        goal_rows: Vec<GoalRow>,
        edge_rows: Vec<EdgeRow>,
        settings: Vec<(String, GoalId)>,
    ) -> Result<Self, GoalError> {
        if let Some(row) = goal_rows.iter().find(|row| row.goal_id < ROOT) {
            return Err(GoalError::InvalidGoalId(row.goal_id));
        }
        let max_id = goal_rows
            .iter()
            .map(|row| row.goal_id)
            .max()
            .ok_or(GoalError::EmptyGraph)?;
        let mut rows: BTreeMap<GoalId, GoalRow> = goal_rows
            .into_iter()
            .map(|row| (row.goal_id, row))
            .collect();

        let mut result = Goals::empty();
        for goal_id in ROOT..=max_id {
            let (name, open) = match rows.remove(&goal_id) {
                Some(row) => (row.name, row.open),
                None => (None, false),
            };
            if name.is_none() || !open {
                result.closed.insert(goal_id);
            }
            result.goals.insert(goal_id, name);
            result.edges.insert(goal_id, Vec::new());
        }

        for EdgeRow { parent, child } in edge_rows {
            let children = result.edges.entry(parent).or_default();
            if !children.contains(&child) {
                children.push(child);
            }
        }

        for (key, value) in settings {
            match key.as_str() {
                SELECTION => result.selection = value,
                PREVIOUS_SELECTION => result.previous_selection = value,
                other => tracing::debug!(key = other, "ignoring unknown setting"),
            }
        }

        result.update_top();
        result.verify()?;

        tracing::debug!(
            goals = result.live_count(),
            max_id,
            "goal graph built from rows"
        );
        Ok(result)
    }

    /// Flatten the graph. Tombstones are included with `name: None`;
    /// consumers filter them if they need to.
    pub fn export(&self) -> GraphRows {
        let goals = self
            .goals
            .iter()
            .map(|(goal_id, name)| GoalRow {
                goal_id: *goal_id,
                name: name.clone(),
                open: !self.is_closed(*goal_id),
            })
            .collect();
        let edges = self
            .edges
            .iter()
            .flat_map(|(parent, children)| {
                children.iter().map(move |child| EdgeRow::new(*parent, *child))
            })
            .collect();
        let settings = vec![
            (SELECTION.to_string(), self.selection),
            (PREVIOUS_SELECTION.to_string(), self.previous_selection),
        ];
        GraphRows {
            goals,
            edges,
            settings,
        }
    }
}

impl GraphRows {
    /// Rebuild a graph from these rows.
    pub fn build(self) -> Result<Goals, GoalError> {
        Goals::build(self.goals, self.edges, self.settings)
    }
}
