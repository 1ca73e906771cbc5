// goal.rs — Mutating subcommands: one per graph operation.

use clap::Subcommand;
use sieben_goal::{DisplayIds, GoalId, Goals, View};

use super::Session;
use crate::config::SiebenConfig;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum GoalCommands {
    /// Add a goal as a dependency of the selection (or of --to).
    Add {
        /// Name of the new goal.
        name: String,
        /// Goal that should depend on the new one.
        #[arg(long)]
        to: Option<GoalId>,
    },
    /// Move the cursor to a goal.
    Select {
        goal_id: GoalId,
        /// Read the id as a display id of this view (open, top or full).
        #[arg(long)]
        view: Option<View>,
    },
    /// Copy the current selection into the previous-selection slot.
    Hold,
    /// Rename the selected goal (or --id).
    Rename {
        name: String,
        #[arg(long)]
        id: Option<GoalId>,
    },
    /// Close the selected goal, or reopen it if it is closed.
    Close,
    /// Add or remove the edge lower -> upper (defaults: previous -> current selection).
    Link {
        #[arg(long)]
        lower: Option<GoalId>,
        #[arg(long)]
        upper: Option<GoalId>,
    },
    /// Put a new goal between the previous and the current selection.
    Insert {
        name: String,
    },
    /// Exchange the names of the previous and the current selection.
    Swap,
    /// Delete the selected goal (or --id) and every goal only it depended on.
    Delete {
        #[arg(long)]
        id: Option<GoalId>,
    },
}

impl GoalCommands {
    fn label(&self) -> &'static str {
        match self {
            GoalCommands::Add { .. } => "add",
            GoalCommands::Select { .. } => "select",
            GoalCommands::Hold => "hold",
            GoalCommands::Rename { .. } => "rename",
            GoalCommands::Close => "close",
            GoalCommands::Link { .. } => "link",
            GoalCommands::Insert { .. } => "insert",
            GoalCommands::Swap => "swap",
            GoalCommands::Delete { .. } => "delete",
        }
    }
}

pub fn execute(cmd: &GoalCommands, config: &SiebenConfig) -> anyhow::Result<()> {
    let mut session = Session::open(config)?;
    let accepted = apply(&mut session.goals, cmd);
    if !accepted {
        anyhow::bail!("`{}` rejected, goal graph unchanged", cmd.label());
    }
    session.commit()?;

    println!(
        "{}: ok (selection {}, previous {})",
        cmd.label(),
        session.goals.selection(),
        session.goals.previous_selection()
    );
    Ok(())
}

/// Run one command against the graph. Returns whether it was committed.
pub fn apply(goals: &mut Goals, cmd: &GoalCommands) -> bool {
    match cmd {
        GoalCommands::Add { name, to } => match goals.add(name.as_str(), *to) {
            Some(goal_id) => {
                println!("Added goal {}", goal_id);
                true
            }
            None => false,
        },
        GoalCommands::Select { goal_id, view } => {
            let target = match view {
                Some(view) => DisplayIds::new(goals, *view).goal(*goal_id),
                None => Some(*goal_id),
            };
            target.is_some_and(|goal_id| goals.select(goal_id))
        }
        GoalCommands::Hold => {
            goals.hold_select();
            true
        }
        GoalCommands::Rename { name, id } => goals.rename(name.as_str(), *id),
        GoalCommands::Close => goals.toggle_close(),
        GoalCommands::Link { lower, upper } => goals.toggle_link(*lower, *upper),
        GoalCommands::Insert { name } => goals.insert(name.as_str()),
        GoalCommands::Swap => {
            goals.swap_goals();
            true
        }
        GoalCommands::Delete { id } => goals.delete(*id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sieben_goal::{GoalEvent, LogSink};
    use sieben_store::GoalStore;
    use tempfile::tempdir;

    fn config_in(dir: &std::path::Path) -> SiebenConfig {
        SiebenConfig {
            database: dir.join("sieben.db"),
            events_log: Some(dir.join("events.jsonl")),
            ..SiebenConfig::default()
        }
    }

    fn stored(config: &SiebenConfig) -> Goals {
        GoalStore::open(&config.database)
            .unwrap()
            .load()
            .unwrap()
            .unwrap()
    }

    #[test]
    fn mutations_persist_between_invocations() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());

        execute(
            &GoalCommands::Add {
                name: "Write tests".into(),
                to: None,
            },
            &config,
        )
        .unwrap();
        execute(
            &GoalCommands::Select {
                goal_id: 2,
                view: None,
            },
            &config,
        )
        .unwrap();
        execute(&GoalCommands::Close, &config).unwrap();

        let goals = stored(&config);
        assert_eq!(goals.name(1), Some("Rename me"));
        assert_eq!(goals.name(2), Some("Write tests"));
        assert!(goals.is_closed(2));
        assert_eq!(goals.selection(), 1);
    }

    #[test]
    fn rejected_mutation_is_an_error_and_saves_nothing() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        execute(&GoalCommands::Hold, &config).unwrap();

        let err = execute(&GoalCommands::Delete { id: Some(1) }, &config).unwrap_err();
        assert!(err.to_string().contains("delete"));
        assert_eq!(stored(&config).live_count(), 1);
    }

    #[test]
    fn committed_events_reach_the_log() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        execute(
            &GoalCommands::Add {
                name: "A".into(),
                to: None,
            },
            &config,
        )
        .unwrap();

        let logged: Vec<GoalEvent> = LogSink::read_all(dir.path().join("events.jsonl"))
            .unwrap()
            .into_iter()
            .map(|entry| entry.event)
            .collect();
        assert_eq!(
            logged,
            vec![
                GoalEvent::Added {
                    goal_id: 1,
                    name: "Rename me".into()
                },
                GoalEvent::Added {
                    goal_id: 2,
                    name: "A".into()
                },
                GoalEvent::Linked { lower: 1, upper: 2 },
            ]
        );
    }

    #[test]
    fn select_by_display_id() {
        let mut goals = Goals::new("Root");
        goals.add("A", None);
        goals.add("B", None);
        goals.delete(Some(2));

        let by_display = GoalCommands::Select {
            goal_id: 2,
            view: Some(View::Open),
        };
        assert!(apply(&mut goals, &by_display));
        assert_eq!(goals.selection(), 3);

        let missing = GoalCommands::Select {
            goal_id: 5,
            view: Some(View::Open),
        };
        assert!(!apply(&mut goals, &missing));
    }

    #[test]
    fn stay_policy_keeps_cursor_on_closed_goal() {
        let dir = tempdir().unwrap();
        let config = SiebenConfig {
            return_to_root_on_close: false,
            ..config_in(dir.path())
        };
        let mut goals = Goals::new("Root").with_focus_policy(config.focus_policy());
        goals.add("A", None);
        goals.select(2);

        assert!(apply(&mut goals, &GoalCommands::Close));
        assert_eq!(goals.selection(), 2);
    }
}
