// show.rs — Read-only subcommands: show, dot, verify.

use clap::Subcommand;
use sieben_goal::{dot_export, enumerate, Fields, View};

use super::Session;
use crate::config::SiebenConfig;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ShowCommands {
    /// Print a JSON snapshot of every live goal.
    Show {
        /// Comma-separated subset of name,edge,open,select,top (default: all).
        #[arg(long)]
        fields: Option<String>,
        /// Show one view (open, top or full) keyed by display ids instead.
        #[arg(long)]
        view: Option<View>,
    },
    /// Print the graph in Graphviz DOT format.
    Dot {
        /// Only the goals that can be worked on right now.
        #[arg(long, conflicts_with = "full")]
        top: bool,
        /// Include closed goals.
        #[arg(long)]
        full: bool,
    },
    /// Re-check every structural invariant of the stored graph.
    Verify,
}

pub fn execute(cmd: &ShowCommands, config: &SiebenConfig) -> anyhow::Result<()> {
    let session = Session::open(config)?;
    println!("{}", render(&session, cmd)?);
    Ok(())
}

fn render(session: &Session, cmd: &ShowCommands) -> anyhow::Result<String> {
    let goals = &session.goals;
    match cmd {
        ShowCommands::Show { fields, view } => {
            let fields = match fields {
                Some(list) => list.parse::<Fields>()?,
                None => Fields::ALL,
            };
            let snapshot = match view {
                Some(view) => enumerate(goals, *view, fields),
                None => goals.all(fields),
            };
            Ok(serde_json::to_string_pretty(&snapshot)?)
        }
        ShowCommands::Dot { top, full } => {
            let view = match (*top, *full) {
                (true, _) => View::Top,
                (false, true) => View::Full,
                (false, false) => View::Open,
            };
            Ok(dot_export(goals, view))
        }
        ShowCommands::Verify => {
            goals.verify()?;
            let migrations = session.store().applied_versions()?;
            Ok(format!(
                "Goal graph verified: {} live goal(s), invariants hold.\nSchema migrations applied: {}",
                goals.live_count(),
                migrations.join(", ")
            ))
        }
    }
}
