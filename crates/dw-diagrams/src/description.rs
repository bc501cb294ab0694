//! Parser for recovered structured-diagram descriptions.
//!
//! The description language is the small D2 subset the recovery prompt asks
//! for:
//!
//! ```text
//! Start: Begin here
//! End: Finish up
//!
//! # Connections
//! Start -> End
//! ```
//!
//! Parsing never fails. Lines that are neither a node nor an edge are ignored.

/// Edge token in the description language.
const EDGE_TOKEN: &str = "->";

/// A declared node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    pub description: String,
}

/// A directed edge. Endpoints are kept verbatim and need not name declared nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

/// Nodes in declaration order plus edges in recorded order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagramGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl DiagramGraph {
    /// Parse a description line by line.
    ///
    /// - blank lines and lines starting with `#` are skipped
    /// - a line containing `->` is an edge, split on the first `->`
    /// - otherwise a line containing `:` declares a node, split on the first `:`
    /// - anything else is ignored
    #[must_use]
    pub fn parse(description: &str) -> Self {
        let mut graph = Self::default();

        for (number, raw) in description.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((source, target)) = line.split_once(EDGE_TOKEN) {
                graph.connect(source.trim(), target.trim());
            } else if let Some((name, text)) = line.split_once(':') {
                graph.declare(name.trim(), text.trim());
            } else {
                tracing::debug!(line = number, content = line, "ignoring unrecognized line");
            }
        }

        tracing::debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "parsed diagram description"
        );
        graph
    }

    /// Declare a node. Redeclaring a name keeps its position and replaces its description.
    pub fn declare(&mut self, name: &str, description: &str) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.name == name) {
            description.clone_into(&mut node.description);
        } else {
            self.nodes.push(Node {
                name: name.to_owned(),
                description: description.to_owned(),
            });
        }
    }

    pub fn connect(&mut self, source: &str, target: &str) {
        self.edges.push(Edge {
            source: source.to_owned(),
            target: target.to_owned(),
        });
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges with at least one endpoint that is not a declared node.
    pub fn dangling_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges
            .iter()
            .filter(|e| !self.has_node(&e.source) || !self.has_node(&e.target))
    }

    fn has_node(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n.name == name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}
