// enumeration.rs — Dense display ids over a filtered view of the graph.
//
// Goal ids are sparse once goals get deleted. A front end that selects goals
// by typing digits wants short, gap-free ids instead, so every visible goal
// gets a display id from its position in ascending goal-id order. Digits run
// 1..9 then 0, so ten goals fit in one keystroke each; beyond that every id
// widens to two digits (11..19, 10, 21..), then three, and so on.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::GoalError;
use crate::goal_tree::{GoalId, Goals};
use crate::snapshot::{Fields, GoalView};

/// Which goals a projection shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    /// Open goals only.
    #[default]
    Open,
    /// Only the top set: what can be worked on right now.
    Top,
    /// Every live goal, closed ones included.
    Full,
}

impl View {
    /// The view after this one: open, top, full, then open again.
    pub fn next(self) -> View {
        match self {
            View::Open => View::Top,
            View::Top => View::Full,
            View::Full => View::Open,
        }
    }

    fn shows(self, goals: &Goals, goal_id: GoalId) -> bool {
        match self {
            View::Open => !goals.is_closed(goal_id),
            View::Top => goals.top().contains(&goal_id),
            View::Full => true,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Open => write!(f, "open"),
            View::Top => write!(f, "top"),
            View::Full => write!(f, "full"),
        }
    }
}

impl FromStr for View {
    type Err = GoalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(View::Open),
            "top" => Ok(View::Top),
            "full" => Ok(View::Full),
            other => Err(GoalError::UnknownView(other.to_string())),
        }
    }
}

/// The two-way mapping between goal ids and display ids for one view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayIds {
    to_display: BTreeMap<GoalId, GoalId>,
    to_goal: BTreeMap<GoalId, GoalId>,
    width: u32,
}

impl DisplayIds {
    pub fn new(goals: &Goals, view: View) -> Self {
        let visible: Vec<GoalId> = goals
            .all(Fields::NONE)
            .into_keys()
            .filter(|id| view.shows(goals, *id))
            .collect();
        let width = digits_needed(visible.len());

        let mut to_display = BTreeMap::new();
        let mut to_goal = BTreeMap::new();
        for (position, goal_id) in visible.into_iter().enumerate() {
            let display = display_id(position, width);
            to_display.insert(goal_id, display);
            to_goal.insert(display, goal_id);
        }
        Self {
            to_display,
            to_goal,
            width,
        }
    }

    /// How many digits every display id has.
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn display(&self, goal_id: GoalId) -> Option<GoalId> {
        self.to_display.get(&goal_id).copied()
    }

    pub fn goal(&self, display: GoalId) -> Option<GoalId> {
        self.to_goal.get(&display).copied()
    }

    pub fn len(&self) -> usize {
        self.to_display.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_display.is_empty()
    }
}

fn digits_needed(count: usize) -> u32 {
    let mut width = 1;
    let mut capacity = 10usize;
    while capacity < count {
        width += 1;
        capacity = capacity.saturating_mul(10);
    }
    width
}

/// Position 0 is "1", position 9 is "0"; each digit of a wider id follows
/// the same 1..9,0 order.
fn display_id(position: usize, width: u32) -> GoalId {
    (0..width).rev().fold(0, |id, exponent| {
        let digit = (position / 10usize.pow(exponent)) % 10;
        id * 10 + ((digit + 1) % 10) as GoalId
    })
}

/// Snapshot of the goals `view` shows, keyed by display id, with edges to
/// hidden goals dropped and the rest renamed to display ids.
pub fn enumerate(goals: &Goals, view: View, fields: Fields) -> BTreeMap<GoalId, GoalView> {
    let ids = DisplayIds::new(goals, view);
    goals
        .all(fields)
        .into_iter()
        .filter_map(|(goal_id, mut goal)| {
            let display = ids.display(goal_id)?;
            if let Some(edges) = goal.edge.as_mut() {
                *edges = edges.iter().filter_map(|child| ids.display(*child)).collect();
            }
            Some((display, goal))
        })
        .collect()
}

/// A goal graph seen through a switchable view with dense display ids.
///
/// Selecting takes display-id digits one at a time: once as many digits as
/// the current width have been typed, the goal they name is selected.
/// Typed-but-unfinished digits are dropped when the view changes or the graph
/// is borrowed mutably.
#[derive(Debug, Clone)]
pub struct Enumeration {
    goals: Goals,
    view: View,
    pending: Option<(GoalId, u32)>,
}

impl Enumeration {
    pub fn new(goals: Goals) -> Self {
        Self {
            goals,
            view: View::default(),
            pending: None,
        }
    }

    pub fn goals(&self) -> &Goals {
        &self.goals
    }

    /// Mutate the underlying graph. Any partially typed id is discarded.
    pub fn goals_mut(&mut self) -> &mut Goals {
        self.pending = None;
        &mut self.goals
    }

    pub fn into_inner(self) -> Goals {
        self.goals
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn display_ids(&self) -> DisplayIds {
        DisplayIds::new(&self.goals, self.view)
    }

    pub fn all(&self, fields: Fields) -> BTreeMap<GoalId, GoalView> {
        enumerate(&self.goals, self.view, fields)
    }

    /// Feed one keystroke of a display id. Returns `true` once a goal was
    /// selected; an incomplete id or one naming no visible goal returns `false`.
    pub fn select(&mut self, key: GoalId) -> bool {
        let ids = self.display_ids();
        let (value, typed) = match self.pending.take() {
            Some((prefix, typed)) => (prefix * 10 + key, typed + 1),
            None => (key, 1),
        };
        if typed < ids.width() {
            self.pending = Some((value, typed));
            return false;
        }
        match ids.goal(value) {
            Some(goal_id) => self.goals.select(goal_id),
            None => {
                tracing::debug!(display = value, view = %self.view, "select rejected: no goal with this display id");
                false
            }
        }
    }

    /// Switch to the next view. Entering the top view moves both selection
    /// slots onto top goals so two-node operations never reach hidden ones.
    pub fn next_view(&mut self) {
        self.view = self.view.next();
        self.pending = None;
        if self.view != View::Top {
            return;
        }
        let Some(&first) = self.goals.top().iter().next() else {
            return;
        };
        if !self.goals.top().contains(&self.goals.selection()) {
            self.goals.select(first);
            self.goals.hold_select();
        } else if !self.goals.top().contains(&self.goals.previous_selection()) {
            self.goals.hold_select();
        }
    }
}
