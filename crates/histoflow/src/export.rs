//! JSON export of computed flows.
//!
//! Two shapes are supported:
//!
//! - [`ExportFormat::Triples`]: `[["Root", "A", 100], ...]`, one
//!   `[from, to, amount]` array per flow.
//! - [`ExportFormat::Graph`]: `{"nodes": [...], "edges": [...]}` with one
//!   node per distinct group, in order of first appearance.

use std::{fmt, str::FromStr};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use histoflow_core::identifier::Id;

use crate::flow::Flow;

/// Output shape of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Triples,
    Graph,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Triples => write!(f, "triples"),
            Self::Graph => write!(f, "graph"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "triples" => Ok(Self::Triples),
            "graph" => Ok(Self::Graph),
            _ => Err(format!(
                "unknown export format `{s}`, expected `triples` or `graph`"
            )),
        }
    }
}

/// A flow as a `[from, to, amount]` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Triple(pub Id, pub Id, pub i64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: Id,
    pub title: Id,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: Id,
    pub target: Id,
    pub value: i64,
}

/// Node and edge lists for Sankey renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

pub fn to_triples(flows: &[Flow]) -> Vec<Triple> {
    flows
        .iter()
        .map(|flow| Triple(flow.from, flow.to, flow.amount))
        .collect()
}

pub fn to_graph(flows: &[Flow]) -> FlowGraph {
    let mut seen = IndexSet::new();
    for flow in flows {
        seen.insert(flow.from);
        seen.insert(flow.to);
    }

    FlowGraph {
        nodes: seen
            .into_iter()
            .map(|id| GraphNode { id, title: id })
            .collect(),
        edges: flows
            .iter()
            .map(|flow| GraphEdge {
                source: flow.from,
                target: flow.to,
                value: flow.amount,
            })
            .collect(),
    }
}

/// Serializes `flows` in `format`.
///
/// # Errors
///
/// Returns the serializer error; group names always serialize, so this is
/// not expected in practice.
pub fn to_json(flows: &[Flow], format: ExportFormat, pretty: bool) -> serde_json::Result<String> {
    match (format, pretty) {
        (ExportFormat::Triples, true) => serde_json::to_string_pretty(&to_triples(flows)),
        (ExportFormat::Triples, false) => serde_json::to_string(&to_triples(flows)),
        (ExportFormat::Graph, true) => serde_json::to_string_pretty(&to_graph(flows)),
        (ExportFormat::Graph, false) => serde_json::to_string(&to_graph(flows)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn flows() -> Vec<Flow> {
        vec![
            Flow::new(Id::new("Root"), Id::new("A"), 100),
            Flow::new(Id::new("A"), Id::new("B"), 30),
            Flow::new(Id::new("A"), Id::new("C"), 70),
        ]
    }

    #[test]
    fn test_triples() {
        let output = to_json(&flows(), ExportFormat::Triples, false).unwrap();
        assert_eq!(output, r#"[["Root","A",100],["A","B",30],["A","C",70]]"#);
    }

    #[test]
    fn test_graph() {
        let output = to_json(&flows(), ExportFormat::Graph, true).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(
            value,
            json!({
                "nodes": [
                    {"id": "Root", "title": "Root"},
                    {"id": "A", "title": "A"},
                    {"id": "B", "title": "B"},
                    {"id": "C", "title": "C"},
                ],
                "edges": [
                    {"source": "Root", "target": "A", "value": 100},
                    {"source": "A", "target": "B", "value": 30},
                    {"source": "A", "target": "C", "value": 70},
                ],
            })
        );
    }

    #[test]
    fn test_graph_nodes_are_distinct() {
        let mut flows = flows();
        flows.push(Flow::new(Id::new("B"), Id::new("C"), 5));

        let graph = to_graph(&flows);

        assert_eq!(graph.nodes.len(), 4);
        assert_eq!(graph.edges.len(), 4);
    }

    #[test]
    fn test_empty_flows() {
        assert_eq!(to_json(&[], ExportFormat::Triples, false).unwrap(), "[]");
        assert_eq!(
            to_json(&[], ExportFormat::Graph, false).unwrap(),
            r#"{"nodes":[],"edges":[]}"#
        );
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("graph".parse::<ExportFormat>(), Ok(ExportFormat::Graph));
        assert_eq!(ExportFormat::Triples.to_string(), "triples");
        assert!("svg".parse::<ExportFormat>().is_err());
    }
}
