// goal_tree.rs — Goals: the mutable dependency graph of goals.
//
// An edge `lower -> upper` means "lower depends on upper finishing first".
// Goal 1 is the root and is never deleted. Deleted goals stay behind as
// edge-free tombstones so that ids are never reused.
//
// The selection cursor has two slots. Single-node operations act on the
// current selection; two-node operations combine it with the previous one,
// which the caller fills via `hold_select()`.
//
// Every public mutation either commits fully (tables, events, top set) or
// leaves the graph untouched and reports the rejection through its return
// value. The invariants that must hold between calls:
//
//   I1  goal 1 is live
//   I2  closed goals depend only on closed goals
//   I3  tombstones are never in the top set
//   I4  every live goal is reachable from the root
//   I5  tombstones have no outgoing edges
//   I6  the edges form a DAG

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::events::GoalEvent;

/// Goal identifier. Assigned as `max(existing) + 1`, never reused.
pub type GoalId = u64;

/// The root goal. It always exists and cannot be deleted.
pub const ROOT: GoalId = 1;

/// Where the cursor goes after a goal is closed.
///
/// Closing is a pure state transition; moving focus back to the root is a
/// UX choice layered on top of it, so hosts can switch it off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusPolicy {
    /// Select the root and hold it, so both slots point at goal 1.
    #[default]
    ReturnToRoot,
    /// Leave the cursor on the goal that was just closed.
    Stay,
}

/// The goal graph engine.
#[derive(Debug, Clone)]
pub struct Goals {
    /// Goal id → name, or `None` for a tombstone.
    pub(crate) goals: BTreeMap<GoalId, Option<String>>,
    /// Goal id → the goals it depends on, in insertion order.
    pub(crate) edges: BTreeMap<GoalId, Vec<GoalId>>,
    /// Closed goals. Tombstones are always members.
    pub(crate) closed: BTreeSet<GoalId>,
    pub(crate) selection: GoalId,
    pub(crate) previous_selection: GoalId,
    /// Cached top set, recomputed after every structural mutation.
    pub(crate) top: BTreeSet<GoalId>,
    pub(crate) events: Vec<GoalEvent>,
    focus_policy: FocusPolicy,
}

impl Goals {
    /// Create a graph holding only the root goal.
    pub fn new(root_name: impl Into<String>) -> Self {
        let name = root_name.into();
        let mut goals = Self::empty();
        goals.goals.insert(ROOT, Some(name.clone()));
        goals.edges.insert(ROOT, Vec::new());
        goals.events.push(GoalEvent::Added {
            goal_id: ROOT,
            name,
        });
        goals.update_top();
        goals
    }

    /// A graph with no goals at all. Only `build` may start from here.
    pub(crate) fn empty() -> Self {
        Self {
            goals: BTreeMap::new(),
            edges: BTreeMap::new(),
            closed: BTreeSet::new(),
            selection: ROOT,
            previous_selection: ROOT,
            top: BTreeSet::new(),
            events: Vec::new(),
            focus_policy: FocusPolicy::default(),
        }
    }

    pub fn with_focus_policy(mut self, policy: FocusPolicy) -> Self {
        self.focus_policy = policy;
        self
    }

    pub fn set_focus_policy(&mut self, policy: FocusPolicy) {
        self.focus_policy = policy;
    }

    pub fn focus_policy(&self) -> FocusPolicy {
        self.focus_policy
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn selection(&self) -> GoalId {
        self.selection
    }

    pub fn previous_selection(&self) -> GoalId {
        self.previous_selection
    }

    /// Whether `goal_id` names a goal that has not been deleted.
    pub fn is_live(&self, goal_id: GoalId) -> bool {
        matches!(self.goals.get(&goal_id), Some(Some(_)))
    }

    /// Whether `goal_id` is in the closed set. Tombstones count as closed.
    pub fn is_closed(&self, goal_id: GoalId) -> bool {
        self.closed.contains(&goal_id)
    }

    /// Name of a live goal.
    pub fn name(&self, goal_id: GoalId) -> Option<&str> {
        self.goals.get(&goal_id).and_then(|name| name.as_deref())
    }

    /// The goals `goal_id` depends on, in insertion order.
    pub fn children(&self, goal_id: GoalId) -> &[GoalId] {
        self.edges
            .get(&goal_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Open goals whose dependencies are all closed.
    pub fn top(&self) -> &BTreeSet<GoalId> {
        &self.top
    }

    /// Number of live goals.
    pub fn live_count(&self) -> usize {
        self.goals.values().filter(|name| name.is_some()).count()
    }

    /// Highest id ever allocated, tombstones included.
    pub fn max_id(&self) -> GoalId {
        self.goals.keys().next_back().copied().unwrap_or(0)
    }

    /// Events recorded since the log was last drained, oldest first.
    pub fn events(&self) -> &[GoalEvent] {
        &self.events
    }

    /// Take every pending event, leaving the log empty.
    pub fn drain_events(&mut self) -> Vec<GoalEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------
    // Creation & naming
    // ------------------------------------------------------------------

    /// Add a new goal as a dependency of `parent` (default: the current
    /// selection). Returns the new id, or `None` if the parent is closed,
    /// deleted, or unknown.
    pub fn add(&mut self, name: impl Into<String>, parent: Option<GoalId>) -> Option<GoalId> {
        let parent = parent.unwrap_or(self.selection);
        if !self.is_live(parent) || self.is_closed(parent) {
            tracing::debug!(parent, "add rejected: parent is closed or missing");
            return None;
        }

        let name = name.into();
        let goal_id = self.max_id() + 1;
        self.goals.insert(goal_id, Some(name.clone()));
        self.edges.insert(goal_id, Vec::new());
        self.events.push(GoalEvent::Added { goal_id, name });
        // A fresh goal has no edges, so this link can never cycle.
        self.push_edge(parent, goal_id);
        self.update_top();

        tracing::debug!(goal_id, parent, "goal added");
        Some(goal_id)
    }

    /// Replace the name of `goal_id` (default: the current selection).
    pub fn rename(&mut self, new_name: impl Into<String>, goal_id: Option<GoalId>) -> bool {
        let goal_id = goal_id.unwrap_or(self.selection);
        if !self.is_live(goal_id) {
            tracing::debug!(goal_id, "rename rejected: no such goal");
            return false;
        }
        let name = new_name.into();
        self.goals.insert(goal_id, Some(name.clone()));
        self.events.push(GoalEvent::Renamed { goal_id, name });
        true
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Move the current selection. Unknown ids and tombstones are ignored.
    pub fn select(&mut self, goal_id: GoalId) -> bool {
        if !self.is_live(goal_id) {
            tracing::debug!(goal_id, "select ignored: no such goal");
            return false;
        }
        self.selection = goal_id;
        self.events.push(GoalEvent::Selected { goal_id });
        true
    }

    /// Copy the current selection into the previous-selection slot.
    pub fn hold_select(&mut self) {
        self.previous_selection = self.selection;
        self.events.push(GoalEvent::HeldSelection {
            goal_id: self.selection,
        });
    }

    // ------------------------------------------------------------------
    // Closing & reopening
    // ------------------------------------------------------------------

    /// Close the selected goal if it is open, reopen it if it is closed.
    ///
    /// Closing requires every dependency to be closed already. Reopening
    /// requires that no closed goal depends on this one. After a successful
    /// close the focus policy decides where the cursor goes.
    pub fn toggle_close(&mut self) -> bool {
        let goal_id = self.selection;
        if self.is_closed(goal_id) {
            if !self.may_be_reopened(goal_id) {
                tracing::debug!(goal_id, "reopen rejected: a closed goal depends on it");
                return false;
            }
            self.closed.remove(&goal_id);
            self.events.push(GoalEvent::Reopened { goal_id });
            self.update_top();
        } else {
            if !self.may_be_closed(goal_id) {
                tracing::debug!(goal_id, "close rejected: it has open dependencies");
                return false;
            }
            self.closed.insert(goal_id);
            self.events.push(GoalEvent::Closed { goal_id });
            self.update_top();
            self.apply_focus_policy();
        }
        true
    }

    fn may_be_closed(&self, goal_id: GoalId) -> bool {
        self.children(goal_id).iter().all(|g| self.is_closed(*g))
    }

    fn may_be_reopened(&self, goal_id: GoalId) -> bool {
        self.parents(goal_id).all(|parent| !self.is_closed(parent))
    }

    fn apply_focus_policy(&mut self) {
        match self.focus_policy {
            FocusPolicy::ReturnToRoot => self.return_to_root(),
            FocusPolicy::Stay => {}
        }
    }

    fn return_to_root(&mut self) {
        self.select(ROOT);
        self.hold_select();
    }

    // ------------------------------------------------------------------
    // Linking
    // ------------------------------------------------------------------

    /// Toggle the dependency `lower -> upper`.
    ///
    /// `lower` defaults to the previous selection and `upper` to the current
    /// one. An existing edge is removed unless it is the last edge keeping
    /// `upper` reachable. A missing edge is added unless `lower` is closed
    /// while `upper` is open, or unless `upper` already reaches `lower`.
    pub fn toggle_link(&mut self, lower: Option<GoalId>, upper: Option<GoalId>) -> bool {
        let lower = lower.unwrap_or(self.previous_selection);
        let upper = upper.unwrap_or(self.selection);
        if lower == upper {
            return false;
        }
        if !self.is_live(lower) || !self.is_live(upper) {
            tracing::debug!(lower, upper, "link rejected: no such goal");
            return false;
        }

        let committed = if self.children(lower).contains(&upper) {
            self.unlink(lower, upper)
        } else {
            self.link(lower, upper)
        };
        self.update_top();
        committed
    }

    fn unlink(&mut self, lower: GoalId, upper: GoalId) -> bool {
        if self.parents(upper).count() < 2 {
            tracing::debug!(lower, upper, "unlink rejected: last edge to the goal");
            return false;
        }
        if let Some(children) = self.edges.get_mut(&lower) {
            children.retain(|&child| child != upper);
        }
        self.events.push(GoalEvent::Unlinked { lower, upper });
        true
    }

    fn link(&mut self, lower: GoalId, upper: GoalId) -> bool {
        if self.is_closed(lower) && !self.is_closed(upper) {
            tracing::debug!(lower, upper, "link rejected: closed goal cannot gain an open dependency");
            return false;
        }
        if self.reachable_from(upper).contains(&lower) {
            tracing::debug!(lower, upper, "link rejected: would create a cycle");
            return false;
        }
        self.push_edge(lower, upper);
        true
    }

    fn push_edge(&mut self, lower: GoalId, upper: GoalId) {
        self.edges.entry(lower).or_default().push(upper);
        self.events.push(GoalEvent::Linked { lower, upper });
    }

    /// Every goal reachable from `start` by following edges. `start` itself
    /// is only included when some path leads back to it.
    pub(crate) fn reachable_from(&self, start: GoalId) -> HashSet<GoalId> {
        let mut reached = HashSet::new();
        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);

        while let Some(goal) = queue.pop_front() {
            for &child in self.children(goal) {
                reached.insert(child);
                if visited.insert(child) {
                    queue.push_back(child);
                }
            }
        }
        reached
    }

    /// Goals holding an edge to `goal_id`. Tombstones never do.
    fn parents(&self, goal_id: GoalId) -> impl Iterator<Item = GoalId> + '_ {
        self.edges
            .iter()
            .filter(move |(_, children)| children.contains(&goal_id))
            .map(|(parent, _)| *parent)
    }

    // ------------------------------------------------------------------
    // Composite operations
    // ------------------------------------------------------------------

    /// Splice a new goal between the previous and the current selection,
    /// so that `previous -> new -> current`. The direct edge
    /// `previous -> current`, if any, is dropped.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let (current, previous) = (self.selection, self.previous_selection);
        if current == previous {
            tracing::debug!(current, "insert rejected: no distinct previous selection");
            return false;
        }
        // The new goal would sit on a path current -> ... -> previous -> new -> current.
        if self.reachable_from(current).contains(&previous) {
            tracing::debug!(current, previous, "insert rejected: would create a cycle");
            return false;
        }
        let Some(goal_id) = self.add(name, Some(previous)) else {
            return false;
        };
        self.toggle_link(Some(goal_id), Some(current));
        if self.children(previous).contains(&current) {
            self.toggle_link(Some(previous), Some(current));
        }
        true
    }

    /// Exchange the names of the current and previous selections. Ids,
    /// edges and open/closed state stay where they are.
    pub fn swap_goals(&mut self) {
        let (first, second) = (self.selection, self.previous_selection);
        let first_name = self.name(first).map(str::to_owned);
        let second_name = self.name(second).map(str::to_owned);
        if let (Some(first_name), Some(second_name)) = (first_name, second_name) {
            self.rename(first_name, Some(second));
            self.rename(second_name, Some(first));
        }
        self.update_top();
    }

    // ------------------------------------------------------------------
    // Deletion
    // ------------------------------------------------------------------

    /// Delete `goal_id` (default: the current selection) together with every
    /// goal that is left without a parent as a result. The root cannot be
    /// deleted. Focus always returns to the root afterwards.
    pub fn delete(&mut self, goal_id: Option<GoalId>) -> bool {
        let goal_id = goal_id.unwrap_or(self.selection);
        if goal_id == ROOT {
            tracing::debug!("delete rejected: the root goal is permanent");
            return false;
        }
        if !self.is_live(goal_id) {
            tracing::debug!(goal_id, "delete rejected: no such goal");
            return false;
        }

        let removed = self.remove_cascade(goal_id);
        self.update_top();
        self.return_to_root();

        tracing::debug!(goal_id, removed, "goal deleted");
        true
    }

    /// Tombstone `goal_id` and then every goal orphaned along the way.
    /// Returns how many goals were removed.
    fn remove_cascade(&mut self, goal_id: GoalId) -> usize {
        let mut pending = vec![goal_id];
        let mut removed = 0;

        while let Some(goal_id) = pending.pop() {
            if !self.is_live(goal_id) {
                continue;
            }
            self.goals.insert(goal_id, None);
            self.closed.insert(goal_id);
            let released = self
                .edges
                .get_mut(&goal_id)
                .map(std::mem::take)
                .unwrap_or_default();
            for children in self.edges.values_mut() {
                children.retain(|&child| child != goal_id);
            }
            self.events.push(GoalEvent::Deleted { goal_id });
            removed += 1;

            // Reverse so that siblings are removed in their edge order.
            for target in released.into_iter().rev() {
                if self.parents(target).next().is_none() {
                    pending.push(target);
                }
            }
        }
        removed
    }

    // ------------------------------------------------------------------
    // Top set
    // ------------------------------------------------------------------

    pub(crate) fn update_top(&mut self) {
        let top = self
            .goals
            .iter()
            .filter(|(id, name)| name.is_some() && !self.is_closed(**id))
            .filter(|(id, _)| self.children(**id).iter().all(|g| self.is_closed(*g)))
            .map(|(id, _)| *id)
            .collect();
        self.top = top;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(set: &BTreeSet<GoalId>) -> Vec<GoalId> {
        set.iter().copied().collect()
    }

    #[test]
    fn new_graph_has_only_root_in_top() {
        let goals = Goals::new("Root");
        assert_eq!(goals.name(ROOT), Some("Root"));
        assert_eq!(ids(goals.top()), vec![1]);
        assert_eq!(
            goals.events(),
            &[GoalEvent::Added {
                goal_id: 1,
                name: "Root".to_string()
            }]
        );
    }

    #[test]
    fn add_links_to_current_selection() {
        let mut goals = Goals::new("Root");
        assert_eq!(goals.add("A", None), Some(2));
        assert_eq!(goals.children(1), &[2]);
        assert_eq!(ids(goals.top()), vec![2]);
    }

    #[test]
    fn add_emits_added_then_linked() {
        let mut goals = Goals::new("Root");
        goals.drain_events();
        goals.add("A", None);
        assert_eq!(
            goals.drain_events(),
            vec![
                GoalEvent::Added {
                    goal_id: 2,
                    name: "A".to_string()
                },
                GoalEvent::Linked { lower: 1, upper: 2 },
            ]
        );
    }

    #[test]
    fn add_to_closed_parent_is_rejected() {
        let mut goals = Goals::new("Root");
        goals.add("A", None);
        goals.select(2);
        assert!(goals.toggle_close());
        goals.drain_events();

        assert_eq!(goals.add("AA", Some(2)), None);
        assert!(goals.events().is_empty());
        assert_eq!(goals.max_id(), 2);
    }

    #[test]
    fn add_to_unknown_parent_is_rejected() {
        let mut goals = Goals::new("Root");
        assert_eq!(goals.add("A", Some(42)), None);
        assert_eq!(goals.live_count(), 1);
    }

    #[test]
    fn rename_current_and_explicit_goal() {
        let mut goals = Goals::new("Root");
        goals.add("Boom", None);
        assert!(goals.rename("A", Some(2)));
        assert!(goals.rename("New root", None));
        assert_eq!(goals.name(2), Some("A"));
        assert_eq!(goals.name(1), Some("New root"));
        assert!(!goals.rename("Ghost", Some(9)));
    }

    #[test]
    fn select_ignores_tombstones() {
        let mut goals = Goals::new("Root");
        goals.add("A", None);
        goals.delete(Some(2));
        goals.drain_events();

        assert!(!goals.select(2));
        assert_eq!(goals.selection(), 1);
        assert!(goals.events().is_empty());
    }

    #[test]
    fn close_requires_closed_dependencies() {
        let mut goals = Goals::new("Root");
        goals.add("A", None);
        goals.drain_events();
        assert!(!goals.toggle_close());
        assert!(!goals.is_closed(1));
        assert!(goals.events().is_empty());
    }

    #[test]
    fn close_returns_focus_to_root() {
        let mut goals = Goals::new("Root");
        goals.add("A", None);
        goals.add("B", None);
        goals.select(2);
        goals.hold_select();
        goals.select(3);
        goals.drain_events();

        assert!(goals.toggle_close());
        assert_eq!(goals.selection(), 1);
        assert_eq!(goals.previous_selection(), 1);
        assert_eq!(
            goals.drain_events(),
            vec![
                GoalEvent::Closed { goal_id: 3 },
                GoalEvent::Selected { goal_id: 1 },
                GoalEvent::HeldSelection { goal_id: 1 },
            ]
        );
    }

    #[test]
    fn stay_policy_keeps_cursor_on_closed_goal() {
        let mut goals = Goals::new("Root").with_focus_policy(FocusPolicy::Stay);
        goals.add("A", None);
        goals.select(2);
        goals.drain_events();

        assert!(goals.toggle_close());
        assert_eq!(goals.selection(), 2);
        assert_eq!(goals.drain_events(), vec![GoalEvent::Closed { goal_id: 2 }]);
    }

    #[test]
    fn reopen_is_blocked_by_closed_parent() {
        let mut goals = Goals::new("Root").with_focus_policy(FocusPolicy::Stay);
        goals.add("A", None);
        goals.select(2);
        goals.toggle_close();
        goals.select(1);
        assert!(goals.toggle_close());

        goals.select(2);
        assert!(!goals.toggle_close());
        assert!(goals.is_closed(2));

        goals.select(1);
        assert!(goals.toggle_close());
        goals.select(2);
        assert!(goals.toggle_close());
        assert!(!goals.is_closed(2));
    }

    #[test]
    fn toggle_link_adds_then_removes_redundant_edge() {
        let mut goals = Goals::new("Root");
        goals.add("A", None);
        goals.add("B", None);
        goals.select(2);
        goals.hold_select();
        goals.select(3);

        assert!(goals.toggle_link(None, None));
        assert_eq!(goals.children(2), &[3]);
        assert_eq!(ids(goals.top()), vec![3]);

        assert!(goals.toggle_link(None, None));
        assert!(goals.children(2).is_empty());
    }

    #[test]
    fn last_incoming_edge_cannot_be_removed() {
        let mut goals = Goals::new("Root");
        goals.add("A", None);
        goals.drain_events();
        assert!(!goals.toggle_link(Some(1), Some(2)));
        assert_eq!(goals.children(1), &[2]);
        assert!(goals.events().is_empty());
    }

    #[test]
    fn closed_goal_cannot_gain_open_dependency() {
        let mut goals = Goals::new("Root");
        goals.add("A", None);
        goals.add("B", None);
        goals.select(2);
        goals.toggle_close();

        assert!(!goals.toggle_link(Some(2), Some(3)));
        assert!(goals.children(2).is_empty());
    }

    #[test]
    fn closed_goal_may_depend_on_closed_goal() {
        let mut goals = Goals::new("Root");
        goals.add("A", None);
        goals.add("B", None);
        goals.select(2);
        goals.toggle_close();
        goals.select(3);
        goals.toggle_close();

        assert!(goals.toggle_link(Some(2), Some(3)));
        assert_eq!(goals.children(2), &[3]);
    }

    #[test]
    fn self_link_is_ignored() {
        let mut goals = Goals::new("Root");
        assert!(!goals.toggle_link(None, None));
        assert!(goals.children(1).is_empty());
    }

    #[test]
    fn cycle_is_rejected() {
        let mut goals = Goals::new("Root");
        goals.add("A", None);
        goals.add("AA", Some(2));
        goals.drain_events();

        assert!(!goals.toggle_link(Some(3), Some(1)));
        assert!(!goals.toggle_link(Some(3), Some(2)));
        assert!(goals.children(3).is_empty());
        assert!(goals.events().is_empty());
    }

    #[test]
    fn insert_splices_between_previous_and_current() {
        let mut goals = Goals::new("Root");
        goals.add("B", None);
        goals.hold_select();
        goals.select(2);

        assert!(goals.insert("A"));
        assert_eq!(goals.children(1), &[3]);
        assert_eq!(goals.children(3), &[2]);
        assert_eq!(ids(goals.top()), vec![2]);
    }

    #[test]
    fn insert_without_distinct_previous_is_rejected() {
        let mut goals = Goals::new("Root");
        goals.add("A", None);
        goals.drain_events();
        assert!(!goals.insert("X"));
        assert!(goals.events().is_empty());
    }

    #[test]
    fn insert_keeps_indirect_edges_of_previous() {
        let mut goals = Goals::new("Root");
        goals.add("A", None);
        goals.add("B", None);
        goals.select(3);
        goals.hold_select();
        goals.select(2);

        // 3 does not depend on 2 yet; the new goal still ends up between them.
        assert!(goals.insert("Mid"));
        assert_eq!(goals.children(3), &[4]);
        assert_eq!(goals.children(4), &[2]);
        assert_eq!(goals.children(1), &[2, 3]);
    }

    #[test]
    fn insert_below_own_dependency_is_rejected_whole() {
        let mut goals = Goals::new("Root");
        goals.add("A", None);
        goals.add("AA", Some(2));
        goals.select(3);
        goals.hold_select();
        goals.select(2);
        goals.drain_events();

        // previous (3) is already reachable from current (2).
        assert!(!goals.insert("Loop"));
        assert_eq!(goals.max_id(), 3);
        assert!(goals.events().is_empty());
    }

    #[test]
    fn swap_exchanges_names_only() {
        let mut goals = Goals::new("Root");
        goals.add("A", None);
        goals.add("B", Some(2));
        goals.select(2);
        goals.hold_select();
        goals.select(3);
        goals.drain_events();

        goals.swap_goals();
        assert_eq!(goals.name(2), Some("B"));
        assert_eq!(goals.name(3), Some("A"));
        assert_eq!(goals.children(2), &[3]);
        assert_eq!(goals.drain_events().len(), 2);
    }

    #[test]
    fn delete_root_is_rejected() {
        let mut goals = Goals::new("Root");
        goals.drain_events();
        assert!(!goals.delete(None));
        assert!(goals.is_live(1));
        assert!(goals.events().is_empty());
    }

    #[test]
    fn delete_cascades_to_exclusive_children() {
        let mut goals = Goals::new("Root");
        goals.add("A", None);
        goals.add("B", Some(2));
        goals.add("C", Some(3));
        goals.drain_events();

        assert!(goals.delete(Some(2)));
        assert_eq!(goals.live_count(), 1);
        assert!(goals.children(1).is_empty());
        assert!(goals.children(2).is_empty());
        assert_eq!(ids(goals.top()), vec![1]);
        assert_eq!(
            goals.drain_events(),
            vec![
                GoalEvent::Deleted { goal_id: 2 },
                GoalEvent::Deleted { goal_id: 3 },
                GoalEvent::Deleted { goal_id: 4 },
                GoalEvent::Selected { goal_id: 1 },
                GoalEvent::HeldSelection { goal_id: 1 },
            ]
        );
    }

    #[test]
    fn delete_spares_shared_children() {
        let mut goals = Goals::new("Root");
        goals.add("A", None);
        goals.add("B", None);
        goals.add("Shared", Some(2));
        assert!(goals.toggle_link(Some(3), Some(4)));

        assert!(goals.delete(Some(2)));
        assert!(goals.is_live(4));
        assert_eq!(goals.children(3), &[4]);
    }

    #[test]
    fn delete_reclaims_diamond_exactly_once() {
        // 1 -> 2 -> {3, 4}, 3 -> 4: deleting 2 must remove 3 and then 4.
        let mut goals = Goals::new("Root");
        goals.add("A", None);
        goals.add("B", Some(2));
        goals.add("C", Some(2));
        assert!(goals.toggle_link(Some(3), Some(4)));
        goals.drain_events();

        assert!(goals.delete(Some(2)));
        let deleted: Vec<_> = goals
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GoalEvent::Deleted { .. }))
            .collect();
        assert_eq!(deleted.len(), 3);
        assert_eq!(goals.live_count(), 1);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut goals = Goals::new("Root");
        goals.add("A", None);
        goals.add("B", None);
        goals.delete(Some(3));
        assert_eq!(goals.add("C", None), Some(4));
    }

    #[test]
    fn reachable_from_excludes_start_on_dag() {
        let mut goals = Goals::new("Root");
        goals.add("A", None);
        goals.add("AA", Some(2));
        let reached = goals.reachable_from(1);
        assert!(reached.contains(&2));
        assert!(reached.contains(&3));
        assert!(!reached.contains(&1));
    }
}
