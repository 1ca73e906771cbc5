// verify.rs — Structural consistency checks.
//
// Mutations keep the invariants by construction, so `verify()` is not run
// after every call. It exists for the load path (`build` refuses anything
// that fails it) and for tests.

use std::collections::{BTreeMap, HashSet};

use crate::error::{GoalError, Invariant};
use crate::goal_tree::{GoalId, Goals, ROOT};

impl Goals {
    /// Check every structural invariant, returning the first violation.
    pub fn verify(&self) -> Result<(), GoalError> {
        if !self.is_live(ROOT) {
            return Err(GoalError::violation(
                Invariant::RootPermanence,
                "goal 1 is missing or deleted",
            ));
        }

        for (parent, children) in &self.edges {
            if let Some(unknown) = std::iter::once(parent)
                .chain(children)
                .find(|id| !self.goals.contains_key(*id))
            {
                return Err(GoalError::violation(
                    Invariant::DanglingEdge,
                    format!("edge {} -> {:?} names unknown goal {}", parent, children, unknown),
                ));
            }
        }

        for closed in &self.closed {
            if let Some(open) = self.children(*closed).iter().find(|g| !self.is_closed(**g)) {
                return Err(GoalError::violation(
                    Invariant::ClosureConsistency,
                    format!("closed goal {} depends on open goal {}", closed, open),
                ));
            }
        }

        if let Some(deleted) = self.top.iter().find(|id| !self.is_live(**id)) {
            return Err(GoalError::violation(
                Invariant::TopSetSoundness,
                format!("deleted goal {} is in the top set", deleted),
            ));
        }

        let reachable = self.reachable_live_goals();
        if let Some(lost) = self.live_ids().find(|id| !reachable.contains(id)) {
            return Err(GoalError::violation(
                Invariant::Connectivity,
                format!("goal {} is not reachable from the root", lost),
            ));
        }

        if let Some(tombstone) = self
            .goals
            .keys()
            .find(|id| !self.is_live(**id) && !self.children(**id).is_empty())
        {
            return Err(GoalError::violation(
                Invariant::TombstoneCleanliness,
                format!("deleted goal {} still has dependencies", tombstone),
            ));
        }

        if self.has_cycle() {
            return Err(GoalError::violation(
                Invariant::Acyclicity,
                "the dependency edges contain a cycle",
            ));
        }

        for slot in [self.selection, self.previous_selection] {
            if !self.is_live(slot) {
                return Err(GoalError::violation(
                    Invariant::DanglingSelection,
                    format!("selection points at missing goal {}", slot),
                ));
            }
        }

        Ok(())
    }

    fn live_ids(&self) -> impl Iterator<Item = GoalId> + '_ {
        self.goals
            .iter()
            .filter(|(_, name)| name.is_some())
            .map(|(id, _)| *id)
    }

    /// Live goals reachable from the root through live goals only.
    fn reachable_live_goals(&self) -> HashSet<GoalId> {
        let mut visited = HashSet::from([ROOT]);
        let mut stack = vec![ROOT];
        while let Some(goal) = stack.pop() {
            for &child in self.children(goal) {
                if self.is_live(child) && visited.insert(child) {
                    stack.push(child);
                }
            }
        }
        visited
    }

    /// Kahn's algorithm over the live subgraph: a cycle leaves goals with
    /// a non-zero in-degree that never get peeled off.
    fn has_cycle(&self) -> bool {
        let mut in_degree: BTreeMap<GoalId, usize> = self.live_ids().map(|id| (id, 0)).collect();
        for parent in self.live_ids() {
            for child in self.children(parent) {
                if let Some(degree) = in_degree.get_mut(child) {
                    *degree += 1;
                }
            }
        }

        let mut ready: Vec<GoalId> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(id, _)| *id)
            .collect();
        let mut peeled = 0;
        while let Some(goal) = ready.pop() {
            peeled += 1;
            for child in self.children(goal) {
                if let Some(degree) = in_degree.get_mut(child) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(*child);
                    }
                }
            }
        }
        peeled < in_degree.len()
    }
}
