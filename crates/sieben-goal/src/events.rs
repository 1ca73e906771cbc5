// events.rs — Mutation events and notification dispatch.
//
// Every accepted mutation appends one or more `GoalEvent`s to the engine's
// pending log; rejected mutations append nothing. The engine never reads its
// own log. Hosts consume it in one of two ways:
//
// - pull: `Goals::events()` to peek, `Goals::drain_events()` to take
// - push: hand drained events to an `EventDispatcher`, which fans them out
//   to any number of `NotificationSink`s (a JSONL log file, a projection)

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GoalError;
use crate::goal_tree::GoalId;

/// One accepted mutation of the goal graph.
///
/// The `#[serde(tag = "event_type")]` attribute makes each variant serialize
/// as a flat object, e.g. `{"event_type":"linked","lower":1,"upper":2}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum GoalEvent {
    /// A goal was created. Always followed by the `Linked` event that
    /// attaches it to its parent (except for the root).
    Added { goal_id: GoalId, name: String },

    /// A goal's name was replaced.
    Renamed { goal_id: GoalId, name: String },

    /// `lower` now depends on `upper`.
    Linked { lower: GoalId, upper: GoalId },

    /// `lower` no longer depends on `upper`.
    Unlinked { lower: GoalId, upper: GoalId },

    /// A goal moved from open to closed.
    Closed { goal_id: GoalId },

    /// A goal moved from closed back to open.
    Reopened { goal_id: GoalId },

    /// A goal became a tombstone.
    Deleted { goal_id: GoalId },

    /// The current selection moved.
    Selected { goal_id: GoalId },

    /// The current selection was copied into the previous-selection slot.
    HeldSelection { goal_id: GoalId },
}

impl GoalEvent {
    /// Get the event type name as a string.
    pub fn event_type(&self) -> &str {
        match self {
            GoalEvent::Added { .. } => "added",
            GoalEvent::Renamed { .. } => "renamed",
            GoalEvent::Linked { .. } => "linked",
            GoalEvent::Unlinked { .. } => "unlinked",
            GoalEvent::Closed { .. } => "closed",
            GoalEvent::Reopened { .. } => "reopened",
            GoalEvent::Deleted { .. } => "deleted",
            GoalEvent::Selected { .. } => "selected",
            GoalEvent::HeldSelection { .. } => "held_selection",
        }
    }

    /// Whether this event changed the graph itself rather than the cursor.
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            GoalEvent::Selected { .. } | GoalEvent::HeldSelection { .. }
        )
    }
}

/// An event as written to a log sink, stamped with the time it was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: GoalEvent,
}

impl LoggedEvent {
    pub fn now(event: GoalEvent) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Trait for receiving goal events.
///
/// Implementations decide what to do with each event, e.g. append it to a
/// file or feed a front end's own projection.
pub trait NotificationSink: Send {
    /// Handle an event. Errors are logged by the dispatcher but don't stop
    /// delivery to other sinks.
    fn send(&self, event: &GoalEvent) -> Result<(), GoalError>;
}

/// Appends events as JSONL to a file.
pub struct LogSink {
    path: PathBuf,
}

impl LogSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read back every event recorded at `path`, oldest first.
    pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<LoggedEvent>, GoalError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| GoalError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(GoalError::from))
            .collect()
    }
}

impl NotificationSink for LogSink {
    fn send(&self, event: &GoalEvent) -> Result<(), GoalError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| GoalError::IoError {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| GoalError::IoError {
                path: self.path.display().to_string(),
                source,
            })?;

        let json = serde_json::to_string(&LoggedEvent::now(event.clone()))?;
        writeln!(file, "{}", json).map_err(|source| GoalError::IoError {
            path: self.path.display().to_string(),
            source,
        })?;

        Ok(())
    }
}

/// Dispatches events to multiple sinks.
///
/// Errors from individual sinks are logged (via tracing) but don't
/// prevent other sinks from receiving the event.
pub struct EventDispatcher {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl EventDispatcher {
    /// Create a new dispatcher with no sinks.
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    /// Add a notification sink.
    pub fn add_sink(&mut self, sink: Box<dyn NotificationSink>) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Dispatch an event to all sinks.
    pub fn dispatch(&self, event: &GoalEvent) {
        for sink in &self.sinks {
            if let Err(e) = sink.send(event) {
                tracing::warn!(event_type = event.event_type(), "notification sink error: {}", e);
            }
        }
    }

    /// Dispatch a batch of events in order, typically `Goals::drain_events()`.
    pub fn dispatch_all(&self, events: impl IntoIterator<Item = GoalEvent>) {
        for event in events {
            self.dispatch(&event);
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
