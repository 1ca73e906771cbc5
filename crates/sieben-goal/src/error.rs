// error.rs — Error types for the goal graph engine.
//
// Rejected mutations (closing an unclosable goal, a link that would cycle,
// deleting the root) are not errors: those operations return `false` and
// leave the graph untouched. The variants here cover the load path, where a
// structurally corrupt graph must be refused, and the I/O done by sinks.

use std::fmt;

use thiserror::Error;

use crate::goal_tree::GoalId;

/// A structural rule that every goal graph must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invariant {
    /// Goal 1 exists and is not a tombstone.
    RootPermanence,
    /// A closed goal only depends on closed goals.
    ClosureConsistency,
    /// Tombstones never appear in the top set.
    TopSetSoundness,
    /// Every live goal is reachable from the root.
    Connectivity,
    /// Tombstones have no outgoing edges.
    TombstoneCleanliness,
    /// Edges between live goals form no cycle.
    Acyclicity,
    /// Every edge endpoint names a known goal id.
    DanglingEdge,
    /// Both selection slots name live goals.
    DanglingSelection,
}

impl fmt::Display for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invariant::RootPermanence => write!(f, "root_permanence"),
            Invariant::ClosureConsistency => write!(f, "closure_consistency"),
            Invariant::TopSetSoundness => write!(f, "top_set_soundness"),
            Invariant::Connectivity => write!(f, "connectivity"),
            Invariant::TombstoneCleanliness => write!(f, "tombstone_cleanliness"),
            Invariant::Acyclicity => write!(f, "acyclicity"),
            Invariant::DanglingEdge => write!(f, "dangling_edge"),
            Invariant::DanglingSelection => write!(f, "dangling_selection"),
        }
    }
}

/// Errors that can occur while loading, checking, or publishing a goal graph.
#[derive(Debug, Error)]
pub enum GoalError {
    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    /// Failed to serialize/deserialize event data.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// The graph breaks one of its structural invariants.
    #[error("invariant {invariant} violated: {detail}")]
    InvariantViolation { invariant: Invariant, detail: String },

    /// `build` was handed no goal rows at all.
    #[error("cannot build a goal graph from zero goal rows")]
    EmptyGraph,

    /// A snapshot field list named something other than
    /// `name`, `edge`, `open`, `select` or `top`.
    #[error("unknown snapshot field: {0}")]
    UnknownField(String),

    /// A goal row carries an id below the root id.
    #[error("goal id {0} is below the root id")]
    InvalidGoalId(GoalId),

    /// A view name other than `open`, `top` or `full`.
    #[error("unknown view: {0}")]
    UnknownView(String),
}

impl GoalError {
    pub(crate) fn violation(invariant: Invariant, detail: impl Into<String>) -> Self {
        GoalError::InvariantViolation {
            invariant,
            detail: detail.into(),
        }
    }
}
