//! Textual box-and-arrow rendering of a [`DiagramGraph`].
//!
//! The output is a fenced block that Markdown shows as preformatted text:
//!
//! ```text
//! ┌────────────┐
//! │ Start      │
//! │ Begin here │
//! └────────────┘
//!     │
//!     ▼
//! Start --> End
//! ```
//!
//! This is a best-effort approximation, not a layout engine: boxes are
//! stacked vertically in declaration order and edges are listed below them.

use crate::consts::{ELLIPSIS, MAX_DESCRIPTION_CHARS};
use crate::description::{DiagramGraph, Node};

const FENCE: &str = "```";
const CONNECTOR: &str = "    │";
const ARROW: &str = "    ▼";

/// Parse and render a description. Never fails.
#[must_use]
pub fn render(description: &str) -> String {
    render_graph(&DiagramGraph::parse(description))
}

/// Render a parsed graph as a fenced textual diagram.
#[must_use]
pub fn render_graph(graph: &DiagramGraph) -> String {
    let mut lines = vec![FENCE.to_owned()];

    for node in graph.nodes() {
        push_box(&mut lines, node);
    }

    if !graph.edges().is_empty() {
        lines.push(ARROW.to_owned());
        for edge in graph.edges() {
            lines.push(format!("{} --> {}", edge.source, edge.target));
        }
    }

    lines.push(FENCE.to_owned());
    lines.join("\n")
}

/// Cut a description to [`MAX_DESCRIPTION_CHARS`] characters plus an ellipsis.
#[must_use]
pub fn truncate_description(description: &str) -> String {
    if description.chars().count() <= MAX_DESCRIPTION_CHARS {
        return description.to_owned();
    }
    let mut truncated: String = description.chars().take(MAX_DESCRIPTION_CHARS).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

fn push_box(lines: &mut Vec<String>, node: &Node) {
    let description = truncate_description(&node.description);
    let width = node
        .name
        .chars()
        .count()
        .max(description.chars().count());
    let border = "─".repeat(width + 2);

    lines.push(format!("┌{border}┐"));
    lines.push(format!("│ {} │", pad(&node.name, width)));
    lines.push(format!("│ {} │", pad(&description, width)));
    lines.push(format!("└{border}┘"));
    lines.push(CONNECTOR.to_owned());
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.chars().count());
    format!("{text}{}", " ".repeat(fill))
}
