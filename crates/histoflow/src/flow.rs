//! Flow balancing over a group graph.
//!
//! The calculator walks the graph depth-first from the root and emits one
//! [`Flow`] per edge, in edge declaration order. Each group splits the value
//! it received from its parent: ordinary children read their value from
//! the histogram source, and the leftover child receives whatever remains.
//!
//! Values travel down the recursion as arguments instead of being stored on
//! the groups, so a group reached through two parents is balanced once per
//! parent with the value that parent assigned.

use log::{debug, trace, warn};
use serde::Serialize;

use histoflow_core::{
    group::{Group, GroupGraph},
    histogram::{HistogramSource, NOT_FOUND},
    identifier::Id,
};

/// One weighted edge of the Sankey diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Flow {
    pub from: Id,
    pub to: Id,
    pub amount: i64,
}

impl Flow {
    pub fn new(from: Id, to: Id, amount: i64) -> Self {
        Self { from, to, amount }
    }
}

/// Computes flows for a single row label.
pub struct FlowCalculator<'a> {
    graph: &'a GroupGraph,
    row: &'a str,
    histograms: &'a dyn HistogramSource,
}

impl<'a> FlowCalculator<'a> {
    pub fn new(graph: &'a GroupGraph, row: &'a str, histograms: &'a dyn HistogramSource) -> Self {
        Self {
            graph,
            row,
            histograms,
        }
    }

    /// Walks the graph from `root` and returns every emitted flow.
    ///
    /// The root contributes no lookup of its own; it starts with a value of
    /// zero. A child already on the current path is skipped, so cyclic
    /// configs terminate.
    pub fn compute(&self, root: Id) -> Vec<Flow> {
        let mut flows = Vec::new();
        let mut path = Vec::new();
        self.visit(root, 0, &mut path, &mut flows);

        debug!(root:% = root, row = self.row, flows = flows.len(); "Flows computed");
        flows
    }

    /// Splits `value` across the children of `group` without recursing.
    ///
    /// Non-leftover children get their looked-up value. The leftover child,
    /// if any, gets `value` minus all of those.
    pub fn split(&self, group: &Group, value: i64) -> Vec<Flow> {
        let from = group.name();
        let mut remainder = value;
        let mut flows = Vec::with_capacity(group.edges().len());

        for &child in group.edges() {
            if group.is_leftover(child) {
                continue;
            }
            let amount = self
                .graph
                .group(child)
                .map_or(NOT_FOUND, |child| self.lookup(child));
            remainder -= amount;
            flows.push(Flow::new(from, child, amount));
        }

        if let Some(leftover) = group.leftover_edge() {
            flows.push(Flow::new(from, leftover, remainder));
        }
        flows
    }

    fn visit(&self, id: Id, incoming: i64, path: &mut Vec<Id>, flows: &mut Vec<Flow>) {
        let Some(group) = self.graph.group(id) else {
            return;
        };

        let value = if !path.is_empty() && group.leftover_edge().is_some() && group.column().is_some()
        {
            self.lookup(group)
        } else {
            incoming
        };
        trace!(group:% = id, value; "Visiting group");

        let outgoing = self.split(group, value);
        flows.extend_from_slice(&outgoing);

        path.push(id);
        for &child in group.edges() {
            if path.contains(&child) {
                warn!(group:% = id, child:% = child; "Skipping edge that closes a cycle");
                continue;
            }
            // Duplicate edges keep the last value assigned to the child.
            let assigned = outgoing
                .iter()
                .rev()
                .find(|flow| flow.to == child)
                .map_or(NOT_FOUND, |flow| flow.amount);
            self.visit(child, assigned, path, flows);
        }
        path.pop();
    }

    fn lookup(&self, group: &Group) -> i64 {
        let (Some(histogram), Some(column)) = (group.histogram(), group.column()) else {
            debug!(group:% = group.name(); "Group has no histogram column to read");
            return NOT_FOUND;
        };
        self.histograms.lookup(histogram, self.row, column)
    }
}

/// Computes the flows of `graph` from `root` for the histogram row `row`.
pub fn compute(
    graph: &GroupGraph,
    root: Id,
    row: &str,
    histograms: &dyn HistogramSource,
) -> Vec<Flow> {
    FlowCalculator::new(graph, row, histograms).compute(root)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::*;

    /// Answers lookups from a `(histogram, column) -> count` map for any row.
    #[derive(Default)]
    struct Counts(HashMap<(String, String), i64>);

    impl Counts {
        fn with(mut self, histogram: &str, column: &str, count: i64) -> Self {
            self.0
                .insert((histogram.to_string(), column.to_string()), count);
            self
        }
    }

    impl HistogramSource for Counts {
        fn columns(&self, _histogram: &str) -> Vec<String> {
            Vec::new()
        }

        fn lookup(&self, histogram: &str, _row: &str, column: &str) -> i64 {
            self.0
                .get(&(histogram.to_string(), column.to_string()))
                .copied()
                .unwrap_or(NOT_FOUND)
        }
    }

    fn set_source(graph: &mut GroupGraph, id: Id, histogram: &str, column: Option<&str>) {
        let group = &mut graph[id];
        group.set_histogram(Some(histogram.to_string()));
        group.set_column(column.map(str::to_string));
    }

    fn flow(from: &str, to: &str, amount: i64) -> Flow {
        Flow::new(Id::new(from), Id::new(to), amount)
    }

    /// `Root => A/H1/Total`, `A => B/H2/Total`, `A => C/!/%`.
    fn scenario_graph() -> GroupGraph {
        let mut graph = GroupGraph::new();
        let root = graph.upsert("Root");
        let a = graph.upsert("A");
        let b = graph.upsert("B");
        let c = graph.upsert("C");

        set_source(&mut graph, a, "H1", Some("Total"));
        graph.connect(root, a);
        set_source(&mut graph, b, "H2", Some("Total"));
        graph.connect(a, b);
        set_source(&mut graph, c, "H1", None);
        graph[a].set_leftover_edge(c);
        graph.connect(a, c);
        graph
    }

    #[test]
    fn test_leftover_scenario() {
        let graph = scenario_graph();
        let counts = Counts::default().with("H1", "Total", 100).with("H2", "Total", 30);

        let flows = compute(&graph, Id::new("Root"), "G1", &counts);

        assert_eq!(
            flows,
            vec![flow("Root", "A", 100), flow("A", "B", 30), flow("A", "C", 70)]
        );
    }

    #[test]
    fn test_missing_counts_propagate_sentinel() {
        let graph = scenario_graph();
        let counts = Counts::default().with("H1", "Total", 100);

        let flows = compute(&graph, Id::new("Root"), "G1", &counts);

        assert_eq!(flows[1], flow("A", "B", NOT_FOUND));
        assert_eq!(flows[2], flow("A", "C", 101));
    }

    #[test]
    fn test_root_leftover_starts_from_zero() {
        let mut graph = GroupGraph::new();
        let root = graph.upsert("Root");
        let a = graph.upsert("A");
        let rest = graph.upsert("Rest");
        set_source(&mut graph, a, "H", Some("Total"));
        graph.connect(root, a);
        graph[root].set_leftover_edge(rest);
        graph.connect(root, rest);

        let counts = Counts::default().with("H", "Total", 40);
        let flows = compute(&graph, root, "G1", &counts);

        assert_eq!(flows, vec![flow("Root", "A", 40), flow("Root", "Rest", -40)]);
    }

    #[test]
    fn test_leftover_without_column_uses_assigned_value() {
        let mut graph = scenario_graph();
        let c = Id::new("C");
        let d = graph.upsert("D");
        let e = graph.upsert("E");
        set_source(&mut graph, d, "H3", Some("Total"));
        graph.connect(c, d);
        graph[c].set_leftover_edge(e);
        graph.connect(c, e);

        let counts = Counts::default()
            .with("H1", "Total", 100)
            .with("H2", "Total", 30)
            .with("H3", "Total", 20);
        let flows = compute(&graph, Id::new("Root"), "G1", &counts);

        // C received 70 from A and has no column to look up.
        assert_eq!(&flows[3..], &[flow("C", "D", 20), flow("C", "E", 50)]);
    }

    #[test]
    fn test_shared_child_is_balanced_per_parent() {
        let mut graph = GroupGraph::new();
        let root = graph.upsert("Root");
        let a = graph.upsert("A");
        let b = graph.upsert("B");
        let shared = graph.upsert("Shared");
        let x = graph.upsert("X");
        let rest = graph.upsert("Rest");
        set_source(&mut graph, a, "HA", Some("Total"));
        set_source(&mut graph, b, "HB", Some("Total"));
        graph.connect(root, a);
        graph.connect(root, b);
        graph[a].set_leftover_edge(shared);
        graph.connect(a, shared);
        graph[b].set_leftover_edge(shared);
        graph.connect(b, shared);
        set_source(&mut graph, x, "HX", Some("Total"));
        graph.connect(shared, x);
        graph[shared].set_leftover_edge(rest);
        graph.connect(shared, rest);

        let counts = Counts::default()
            .with("HA", "Total", 10)
            .with("HB", "Total", 20)
            .with("HX", "Total", 1);
        let flows = compute(&graph, root, "G1", &counts);

        assert_eq!(
            flows,
            vec![
                flow("Root", "A", 10),
                flow("Root", "B", 20),
                flow("A", "Shared", 10),
                flow("Shared", "X", 1),
                flow("Shared", "Rest", 9),
                flow("B", "Shared", 20),
                flow("Shared", "X", 1),
                flow("Shared", "Rest", 19),
            ]
        );
    }

    #[test]
    fn test_cycle_terminates() {
        let mut graph = GroupGraph::new();
        let root = graph.upsert("Root");
        let a = graph.upsert("A");
        let b = graph.upsert("B");
        graph.connect(root, a);
        graph.connect(a, b);
        graph.connect(b, a);

        let flows = compute(&graph, root, "G1", &Counts::default());

        assert_eq!(
            flows,
            vec![
                flow("Root", "A", NOT_FOUND),
                flow("A", "B", NOT_FOUND),
                flow("B", "A", NOT_FOUND),
            ]
        );
    }

    #[test]
    fn test_split_in_isolation() {
        let graph = scenario_graph();
        let counts = Counts::default().with("H2", "Total", 12);
        let calculator = FlowCalculator::new(&graph, "G1", &counts);

        let flows = calculator.split(&graph[Id::new("A")], 50);

        assert_eq!(flows, vec![flow("A", "B", 12), flow("A", "C", 38)]);
    }

    proptest! {
        /// The leftover amount balances the parent's value against its
        /// other children.
        #[test]
        fn prop_leftover_conserves_value(
            parent in -1_000i64..1_000_000,
            children in prop::collection::vec(-1i64..100_000, 0..8)
        ) {
            let mut graph = GroupGraph::new();
            let root = graph.upsert("Root");
            let p = graph.upsert("P");
            set_source(&mut graph, p, "HP", Some("Total"));
            graph.connect(root, p);

            let mut counts = Counts::default().with("HP", "Total", parent);
            for (i, count) in children.iter().enumerate() {
                let histogram = format!("H{i}");
                let child = graph.upsert(&format!("P.{i}"));
                set_source(&mut graph, child, &histogram, Some("Total"));
                graph.connect(p, child);
                counts = counts.with(&histogram, "Total", *count);
            }
            let rest = graph.upsert("P.rest");
            graph[p].set_leftover_edge(rest);
            graph.connect(p, rest);

            let flows = compute(&graph, root, "G1", &counts);

            let from_p: Vec<_> = flows.iter().filter(|f| f.from == p).collect();
            prop_assert_eq!(from_p.len(), children.len() + 1);
            let siblings: i64 = from_p[..children.len()].iter().map(|f| f.amount).sum();
            let leftover = from_p[children.len()];
            prop_assert_eq!(leftover.to, rest);
            prop_assert_eq!(leftover.amount, parent - siblings);
        }
    }
}
