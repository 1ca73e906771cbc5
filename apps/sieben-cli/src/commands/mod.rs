pub mod goal;
pub mod show;

use anyhow::Context;
use sieben_goal::{EventDispatcher, Goals, LogSink};
use sieben_store::GoalStore;

use crate::config::SiebenConfig;

/// One invocation's view of the database: load, mutate, commit.
pub struct Session {
    store: GoalStore,
    pub goals: Goals,
    dispatcher: EventDispatcher,
}

impl Session {
    pub fn open(config: &SiebenConfig) -> anyhow::Result<Self> {
        let store = GoalStore::open(&config.database)
            .with_context(|| format!("failed to open {}", config.database.display()))?;
        let mut goals = store.load_or_new(&config.root_name)?;
        goals.set_focus_policy(config.focus_policy());
        tracing::debug!(policy = ?goals.focus_policy(), "goal graph ready");

        let mut dispatcher = EventDispatcher::new();
        if let Some(path) = &config.events_log {
            dispatcher.add_sink(Box::new(LogSink::new(path)));
        }

        Ok(Self {
            store,
            goals,
            dispatcher,
        })
    }

    pub fn store(&self) -> &GoalStore {
        &self.store
    }

    /// Persist the graph and hand its pending events to the sinks.
    pub fn commit(&mut self) -> anyhow::Result<()> {
        self.store
            .save(&self.goals)
            .context("failed to save goal graph")?;
        let events = self.goals.drain_events();
        let structural = events.iter().filter(|e| e.is_structural()).count();
        tracing::debug!(count = events.len(), structural, "goal graph committed");
        if !self.dispatcher.is_empty() {
            self.dispatcher.dispatch_all(events);
        }
        Ok(())
    }
}
