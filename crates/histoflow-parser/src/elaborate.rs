//! Graph construction from parsed config lines.
//!
//! The [`Builder`] walks the lines once, in order, upserting groups and
//! connecting them. Fan-out lines consult the [`HistogramSource`] for the
//! columns to expand into.

use std::collections::HashMap;

use log::{debug, info};

use histoflow_core::{
    group::{DepthChange, GroupGraph},
    histogram::HistogramSource,
    identifier::Id,
};

use crate::{
    ParsedConfig,
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    parser_types::{ColumnSpec, Destination, EdgeLine, HistogramRef, Line, PLACEHOLDER_COLUMN},
    properties::Properties,
    span::{Span, Spanned},
};

pub(crate) struct Builder<'h> {
    histograms: &'h dyn HistogramSource,
    graph: GroupGraph,
    properties: Properties,
    collector: DiagnosticCollector,
    /// Line that first gave each group a child.
    first_child_line: HashMap<Id, Span>,
}

impl<'h> Builder<'h> {
    pub fn new(histograms: &'h dyn HistogramSource) -> Self {
        Self {
            histograms,
            graph: GroupGraph::new(),
            properties: Properties::new(),
            collector: DiagnosticCollector::new(),
            first_child_line: HashMap::new(),
        }
    }

    /// Build the group graph and property map.
    ///
    /// # Errors
    ///
    /// Construction itself only produces warnings; the error path exists
    /// for diagnostics of error severity.
    pub fn build(mut self, lines: &[Spanned<Line<'_>>]) -> Result<ParsedConfig, ParseError> {
        for line in lines {
            match line.inner() {
                Line::Property(property) => {
                    debug!(key = property.key, value = property.value; "Setting property");
                    self.properties.insert(property.key, property.value);
                }
                Line::Edge(edge) => self.add_edge(edge, line.span()),
            }
        }

        let warnings = self.collector.finish()?;
        info!(
            groups = self.graph.len(),
            properties = self.properties.len(),
            warnings = warnings.len();
            "Group graph built"
        );

        Ok(ParsedConfig::new(self.graph, self.properties, warnings))
    }

    fn add_edge(&mut self, edge: &EdgeLine<'_>, span: Span) {
        let source = self.graph.upsert(edge.source);

        let histogram = match edge.histogram {
            HistogramRef::Explicit(histogram) => Some(histogram.to_string()),
            HistogramRef::InheritFromSource => {
                self.graph[source].histogram().map(str::to_string)
            }
        };

        match edge.destination {
            Destination::FanOut => self.fan_out(source, histogram, span),
            Destination::Named(name) => {
                self.named_destination(source, name, histogram, edge.column, span)
            }
        }
    }

    /// Expand `&` into one child per column of `histogram`.
    fn fan_out(&mut self, source: Id, histogram: Option<String>, span: Span) {
        let Some(histogram) = histogram else {
            self.collector.emit(
                Diagnostic::warning(format!(
                    "fan-out from `{source}` has no histogram to expand"
                ))
                .with_code(ErrorCode::E202)
                .with_label(span, "inherits from a group without a histogram")
                .with_help("name the histogram explicitly instead of `!`"),
            );
            return;
        };

        let columns = self.histograms.columns(&histogram);
        debug!(source:% = source, histogram, columns = columns.len(); "Expanding fan-out");

        for column in columns {
            let child = self.graph.upsert_id(Id::qualified(&histogram, &column));
            let group = &mut self.graph[child];
            group.set_histogram(Some(histogram.clone()));
            group.set_column(Some(column));
            self.connect(source, child, span);
        }
    }

    fn named_destination(
        &mut self,
        source: Id,
        name: &str,
        histogram: Option<String>,
        column: ColumnSpec<'_>,
        span: Span,
    ) {
        let child = self.graph.upsert(name);
        self.graph[child].set_histogram(histogram);

        match column {
            ColumnSpec::Named(column) => self.graph[child].set_column(Some(column.to_string())),
            ColumnSpec::Leftover => self.graph[source].set_leftover_edge(child),
            ColumnSpec::Placeholder => {
                self.graph[child].set_column(Some(PLACEHOLDER_COLUMN.to_string()));
                self.collector.emit(
                    Diagnostic::warning(format!("group `{child}` reads the `*` column"))
                        .with_code(ErrorCode::E201)
                        .with_label(span, "`*` is only meaningful on `&` lines")
                        .with_help("name a column, or use `%` for the remainder"),
                );
            }
        }

        self.connect(source, child, span);
    }

    fn connect(&mut self, parent: Id, child: Id, span: Span) {
        self.first_child_line.entry(parent).or_insert(span);

        if self.graph.connect(parent, child) != DepthChange::RaisedWithChildren {
            return;
        }

        let mut diagnostic = Diagnostic::warning(format!(
            "depth of group `{child}` raised after its children were declared"
        ))
        .with_code(ErrorCode::E200)
        .with_label(span, "depth raised here");
        if let Some(&children_span) = self.first_child_line.get(&child) {
            diagnostic = diagnostic
                .with_secondary_label(children_span, format!("children of `{child}` declared here"));
        }
        self.collector.emit(
            diagnostic.with_help(format!(
                "declare the edges into `{child}` before the edges out of it"
            )),
        );
    }
}
