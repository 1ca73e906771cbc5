//! # sieben-goal
//!
//! The goal graph engine behind Sieben.
//!
//! A [`Goals`] value owns one mutable directed graph of named goals, where an
//! edge `a -> b` means "a depends on b finishing first". Goal 1 is the root.
//! Every mutation keeps the graph acyclic, keeps every live goal reachable
//! from the root, and never lets a closed goal depend on an open one. After
//! each mutation the engine recomputes the *top set*: the open goals whose
//! dependencies are all closed, i.e. what can be worked on right now.
//!
//! ## Key components
//!
//! - [`Goals`] — the engine: single-node and selection-relative two-node
//!   operations, cascading delete, top-set maintenance
//! - [`Fields`] / [`GoalView`] — the typed snapshot query ([`Goals::all`])
//! - [`GoalRow`] / [`EdgeRow`] / [`GraphRows`] — the flat relational form
//!   produced by [`Goals::export`] and consumed by [`Goals::build`]
//! - [`GoalEvent`] — the append-only mutation log, drained by the host
//! - [`EventDispatcher`] / [`NotificationSink`] — push delivery of events
//! - [`Enumeration`] / [`View`] — open/top/full views with dense display ids
//! - [`dot_export`] — Graphviz rendering of a view
//!
//! ## Quick Example
//!
//! ```rust
//! use sieben_goal::{Fields, Goals};
//!
//! let mut goals = Goals::new("Root");
//! let a = goals.add("A", None).unwrap();
//! goals.add("B", None);
//! assert!(goals.select(a));
//! assert!(goals.toggle_close());
//! assert_eq!(goals.top().iter().copied().collect::<Vec<_>>(), vec![3]);
//! assert_eq!(goals.all(Fields::NAME).len(), 3);
//! ```

pub mod dot;
pub mod enumeration;
pub mod error;
pub mod events;
pub mod goal_tree;
pub mod rows;
pub mod snapshot;
mod verify;

pub use dot::{dot_export, split_long};
pub use enumeration::{enumerate, DisplayIds, Enumeration, View};
pub use error::{GoalError, Invariant};
pub use events::{EventDispatcher, GoalEvent, LogSink, LoggedEvent, NotificationSink};
pub use goal_tree::{FocusPolicy, GoalId, Goals, ROOT};
pub use rows::{EdgeRow, GoalRow, GraphRows, PREVIOUS_SELECTION, SELECTION};
pub use snapshot::{Fields, GoalView, SelectionRole};
