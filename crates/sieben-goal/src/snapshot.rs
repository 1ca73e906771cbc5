// snapshot.rs — The read surface: `Goals::all(fields)`.
//
// Callers pick which attributes they want with a `Fields` set and get back
// one `GoalView` per live goal, keyed by id. Attributes that were not asked
// for stay `None` and are left out of the JSON form.

use std::collections::BTreeMap;
use std::ops::BitOr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GoalError;
use crate::goal_tree::{GoalId, Goals};

/// Which attributes a snapshot should populate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fields {
    pub name: bool,
    pub edge: bool,
    pub open: bool,
    pub select: bool,
    pub top: bool,
}

impl Fields {
    pub const NONE: Fields = Fields {
        name: false,
        edge: false,
        open: false,
        select: false,
        top: false,
    };
    pub const NAME: Fields = Fields {
        name: true,
        ..Fields::NONE
    };
    pub const EDGE: Fields = Fields {
        edge: true,
        ..Fields::NONE
    };
    pub const OPEN: Fields = Fields {
        open: true,
        ..Fields::NONE
    };
    pub const SELECT: Fields = Fields {
        select: true,
        ..Fields::NONE
    };
    pub const TOP: Fields = Fields {
        top: true,
        ..Fields::NONE
    };
    pub const ALL: Fields = Fields {
        name: true,
        edge: true,
        open: true,
        select: true,
        top: true,
    };

    pub const fn union(self, other: Fields) -> Fields {
        Fields {
            name: self.name || other.name,
            edge: self.edge || other.edge,
            open: self.open || other.open,
            select: self.select || other.select,
            top: self.top || other.top,
        }
    }
}

impl BitOr for Fields {
    type Output = Fields;

    fn bitor(self, rhs: Fields) -> Fields {
        self.union(rhs)
    }
}

/// Parses a comma-separated list such as `"name,edge,open"`.
impl FromStr for Fields {
    type Err = GoalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .try_fold(Fields::NONE, |fields, part| {
                let field = match part {
                    "name" => Fields::NAME,
                    "edge" => Fields::EDGE,
                    "open" => Fields::OPEN,
                    "select" => Fields::SELECT,
                    "top" => Fields::TOP,
                    other => return Err(GoalError::UnknownField(other.to_string())),
                };
                Ok(fields | field)
            })
    }
}

/// A goal's role in the selection cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionRole {
    /// The current selection.
    Select,
    /// The previous selection (and not also the current one).
    Prev,
    /// Neither slot points here.
    #[serde(rename = "none")]
    Unselected,
}

/// One live goal as seen through a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalView {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Dependency ids, sorted ascending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge: Option<Vec<GoalId>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<SelectionRole>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<bool>,
}

impl Goals {
    /// Snapshot every live goal, populating only the requested fields.
    /// Never mutates the graph or the event log.
    pub fn all(&self, fields: Fields) -> BTreeMap<GoalId, GoalView> {
        self.goals
            .iter()
            .filter_map(|(id, name)| name.as_ref().map(|name| (*id, name)))
            .map(|(id, name)| {
                let view = GoalView {
                    name: fields.name.then(|| name.clone()),
                    edge: fields.edge.then(|| {
                        let mut edges = self.children(id).to_vec();
                        edges.sort_unstable();
                        edges
                    }),
                    open: fields.open.then(|| !self.is_closed(id)),
                    select: fields.select.then(|| self.selection_role(id)),
                    top: fields.top.then(|| self.top.contains(&id)),
                };
                (id, view)
            })
            .collect()
    }

    pub fn selection_role(&self, goal_id: GoalId) -> SelectionRole {
        if goal_id == self.selection {
            SelectionRole::Select
        } else if goal_id == self.previous_selection {
            SelectionRole::Prev
        } else {
            SelectionRole::Unselected
        }
    }
}
