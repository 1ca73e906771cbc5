// dot.rs — Graphviz rendering of a goal graph.
//
// Works from the enumerated snapshot, the same read surface any other
// projection gets, so node ids are display ids. Edges are drawn from
// dependency to dependent so the root ends up at the bottom of the picture.

use crate::enumeration::{enumerate, View};
use crate::goal_tree::{GoalId, Goals};
use crate::snapshot::{Fields, GoalView, SelectionRole};

/// Labels are wrapped once a line grows past this many characters.
const LABEL_WIDTH: usize = 20;

/// Render the goals `view` shows as a `digraph`.
pub fn dot_export(goals: &Goals, view: View) -> String {
    let visible = enumerate(goals, view, Fields::ALL);

    let mut lines = vec!["digraph g {".to_string(), "node [shape=box];".to_string()];
    for (id, goal) in &visible {
        lines.push(node_line(*id, goal));
    }
    for (id, goal) in &visible {
        for child in goal.edge.iter().flatten() {
            if let Some(dependency) = visible.get(child) {
                let color = if dependency.open == Some(true) {
                    "black"
                } else {
                    "gray"
                };
                lines.push(format!("{} -> {} [color={}];", child, id, color));
            }
        }
    }
    lines.push("}".to_string());
    lines.join("\n")
}

fn node_line(id: GoalId, goal: &GoalView) -> String {
    let name = goal.name.as_deref().unwrap_or_default();
    let label = split_long(&format!("{}: {}", id, escape(name)));
    let color = if goal.open == Some(true) {
        "red"
    } else {
        "green"
    };
    let mut attributes = vec![format!("label=\"{}\"", label), format!("color={}", color)];

    let fill = match goal.select {
        Some(SelectionRole::Select) => Some("gray"),
        Some(SelectionRole::Prev) => Some("lightgray"),
        _ => None,
    };
    match (goal.top == Some(true), fill) {
        (true, Some(fill)) => {
            attributes.push("style=\"bold,filled\"".to_string());
            attributes.push(format!("fillcolor={}", fill));
        }
        (true, None) => attributes.push("style=bold".to_string()),
        (false, Some(fill)) => {
            attributes.push("style=filled".to_string());
            attributes.push(format!("fillcolor={}", fill));
        }
        (false, None) => {}
    }

    format!("{} [{}];", id, attributes.join(", "))
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Wrap a label onto several lines.
///
/// Words are separated by single spaces only, so newlines already present
/// in the text stay inside their word. A line is closed as soon as it grows
/// past the label width.
pub fn split_long(line: &str) -> String {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in line.split(' ') {
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
        if current.chars().count() > LABEL_WIDTH {
            lines.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumeration::Enumeration;

    fn sample() -> Goals {
        let mut goals = Goals::new("Root");
        goals.add("Middle", None);
        goals.add("Top", Some(2));
        goals.add("Closed", None);
        goals.select(4);
        goals.toggle_close();
        goals
    }

    #[test]
    fn open_view_hides_closed_goals() {
        let goals = sample();
        assert_eq!(
            dot_export(&goals, View::Open),
            "digraph g {
node [shape=box];
1 [label=\"1: Root\", color=red, style=filled, fillcolor=gray];
2 [label=\"2: Middle\", color=red];
3 [label=\"3: Top\", color=red, style=bold];
2 -> 1 [color=black];
3 -> 2 [color=black];
}"
        );
    }

    #[test]
    fn full_view_marks_both_selections() {
        let mut goals = sample();
        goals.hold_select();
        goals.select(3);
        assert_eq!(
            dot_export(&goals, View::Full),
            "digraph g {
node [shape=box];
1 [label=\"1: Root\", color=red, style=filled, fillcolor=lightgray];
2 [label=\"2: Middle\", color=red];
3 [label=\"3: Top\", color=red, style=\"bold,filled\", fillcolor=gray];
4 [label=\"4: Closed\", color=green];
2 -> 1 [color=black];
4 -> 1 [color=gray];
3 -> 2 [color=black];
}"
        );
    }

    #[test]
    fn top_view_shows_only_top_goals() {
        let mut goals = Goals::new("Root");
        goals.add("Middle", None);
        goals.add("Top", Some(2));
        goals.add("Closed", None);
        goals.add("More closed", Some(3));
        goals.select(5);
        goals.toggle_close();
        goals.select(4);
        goals.toggle_close();

        let mut e = Enumeration::new(goals);
        e.next_view();
        assert_eq!(
            dot_export(e.goals(), e.view()),
            "digraph g {
node [shape=box];
1 [label=\"1: Top\", color=red, style=\"bold,filled\", fillcolor=gray];
}"
        );
    }

    #[test]
    fn node_ids_are_display_ids() {
        let mut goals = Goals::new("Root");
        goals.add("Gone", None);
        goals.add("Kept", None);
        goals.delete(Some(2));
        assert_eq!(
            dot_export(&goals, View::Open),
            "digraph g {
node [shape=box];
1 [label=\"1: Root\", color=red, style=filled, fillcolor=gray];
2 [label=\"2: Kept\", color=red, style=bold];
2 -> 1 [color=black];
}"
        );
    }

    #[test]
    fn labels_are_escaped() {
        for (raw, escaped) in [
            ("'", "&#x27;"),
            ("\"", "&quot;"),
            ("<", "&lt;"),
            (">", "&gt;"),
            ("&", "&amp;"),
        ] {
            let goals = Goals::new(format!("Escape: {}", raw));
            assert_eq!(
                dot_export(&goals, View::Open),
                format!(
                    "digraph g {{\nnode [shape=box];\n1 [label=\"1: Escape: {}\", color=red, style=\"bold,filled\", fillcolor=gray];\n}}",
                    escaped
                )
            );
        }
    }

    #[test]
    fn split_long_wraps_after_width() {
        assert_eq!(split_long("short"), "short");
        assert_eq!(
            split_long("10: Example multi-word Sieben label"),
            "10: Example multi-word\nSieben label"
        );
        assert_eq!(
            split_long("123: Example very-very long multi-word Sieben label"),
            "123: Example very-very\nlong multi-word Sieben\nlabel"
        );
    }

    #[test]
    fn split_long_keeps_manual_newlines_inside_words() {
        assert_eq!(
            split_long("43: Manual-placed\nnewlines\nare ignored"),
            "43: Manual-placed\nnewlines\nare\nignored"
        );
    }
}
