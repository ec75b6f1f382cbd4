//! Line-level parser for breakdown configs.
//!
//! Each trimmed, non-blank line is classified by content:
//! - a line containing `:` is a property line (`Key: Value`); without a
//!   `": "` separator it is ignored like any other unrecognized line,
//! - otherwise a line containing ` => ` is an edge line
//!   (`Source => Destination/Histogram/Column`),
//! - anything else is ignored.
//!
//! The public entry point is [`parse_lines`], which reports every malformed
//! edge line in one pass.

use log::{debug, trace};
use winnow::{
    Parser as _,
    combinator::{separated, separated_pair},
    error::ModalResult,
    token::{rest, take_till, take_until},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    parser_types::{ColumnSpec, Destination, EdgeLine, HistogramRef, Line, Property},
    span::{Span, Spanned},
};

const PROPERTY_MARKER: char = ':';
const PROPERTY_SEPARATOR: &str = ": ";
const EDGE_ARROW: &str = " => ";
const FIELD_SEPARATOR: char = '/';
const EDGE_FIELDS: [&str; 3] = ["destination", "histogram", "column"];

const EDGE_HELP: &str = "write edges as `Source => Destination/Histogram/Column`";

type Input<'src> = &'src str;

/// Parse `Key: Value`, splitting on the first `": "`.
fn property<'src>(input: &mut Input<'src>) -> ModalResult<Property<'src>> {
    separated_pair(take_until(0.., PROPERTY_SEPARATOR), PROPERTY_SEPARATOR, rest)
        .map(|(key, value)| Property { key, value })
        .parse_next(input)
}

/// Parse one `/`-delimited field of an edge's right-hand side.
fn field<'src>(input: &mut Input<'src>) -> ModalResult<&'src str> {
    take_till(0.., FIELD_SEPARATOR)
        .map(str::trim)
        .parse_next(input)
}

/// Parse `Source => f1/f2/...` into the source and its raw fields.
fn edge<'src>(input: &mut Input<'src>) -> ModalResult<(&'src str, Vec<&'src str>)> {
    separated_pair(
        take_until(0.., EDGE_ARROW).map(str::trim),
        EDGE_ARROW,
        separated(1.., field, FIELD_SEPARATOR),
    )
    .parse_next(input)
}

/// Returns `None` when the line has no `": "` separator.
fn parse_property(line: &str) -> Option<Line<'_>> {
    let mut input = line;
    property.parse_next(&mut input).ok().map(Line::Property)
}

fn parse_edge(line: &str, span: Span) -> Result<Line<'_>, Diagnostic> {
    let malformed = |reason: String| {
        Diagnostic::error(format!("malformed edge line `{line}`"))
            .with_code(ErrorCode::E100)
            .with_label(span, reason)
            .with_help(EDGE_HELP)
    };

    let mut input = line;
    let (source, fields) = edge
        .parse_next(&mut input)
        .map_err(|_| malformed("expected `Source => Destination/Histogram/Column`".into()))?;

    let &[destination, histogram, column] = fields.as_slice() else {
        return Err(malformed(format!(
            "expected 3 `/`-separated fields, found {}",
            fields.len()
        )));
    };

    for (name, value) in EDGE_FIELDS.iter().zip([destination, histogram, column]) {
        if value.is_empty() {
            return Err(malformed(format!("empty {name} field")));
        }
    }

    Ok(Line::Edge(EdgeLine {
        source,
        destination: Destination::from_token(destination),
        histogram: HistogramRef::from_token(histogram),
        column: ColumnSpec::from_token(column),
    }))
}

/// Classify a single trimmed line.
///
/// Returns `Ok(None)` for lines that are neither properties nor edges.
fn parse_line(line: &str, span: Span) -> Result<Option<Line<'_>>, Diagnostic> {
    if line.contains(PROPERTY_MARKER) {
        let property = parse_property(line);
        if property.is_none() {
            trace!(line; "Ignoring line without a property separator");
        }
        Ok(property)
    } else if line.contains(EDGE_ARROW) {
        parse_edge(line, span).map(Some)
    } else {
        trace!(line; "Ignoring line");
        Ok(None)
    }
}

/// Trimmed, non-blank lines of `source` with their spans.
fn trimmed_lines(source: &str) -> impl Iterator<Item = (&str, Span)> {
    source
        .split_inclusive('\n')
        .scan(0, |offset, raw| {
            let start = *offset + (raw.len() - raw.trim_start().len());
            *offset += raw.len();
            let line = raw.trim();
            Some((line, Span::new(start..start + line.len())))
        })
        .filter(|(line, _)| !line.is_empty())
}

/// Parse config source into typed lines.
///
/// # Errors
///
/// Returns a [`ParseError`] with one diagnostic per malformed edge or
/// property line.
pub(crate) fn parse_lines(source: &str) -> Result<Vec<Spanned<Line<'_>>>, ParseError> {
    let mut collector = DiagnosticCollector::new();
    let mut lines = Vec::new();

    for (line, span) in trimmed_lines(source) {
        match parse_line(line, span) {
            Ok(Some(parsed)) => lines.push(Spanned::new(parsed, span)),
            Ok(None) => {}
            Err(diagnostic) => collector.emit(diagnostic),
        }
    }

    collector.finish()?;
    debug!(lines = lines.len(); "Config lines parsed");
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(source: &str) -> Line<'_> {
        let mut lines = parse_lines(source).expect("should parse");
        assert_eq!(lines.len(), 1, "expected exactly one line");
        lines.remove(0).into_inner()
    }

    fn first_error(source: &str) -> Diagnostic {
        let err = parse_lines(source).expect_err("should fail");
        err.diagnostics()[0].clone()
    }

    #[test]
    fn test_property_line() {
        assert_eq!(
            single("GroupName: Enabled_20250131"),
            Line::Property(Property {
                key: "GroupName",
                value: "Enabled_20250131",
            })
        );
    }

    #[test]
    fn test_property_splits_on_first_separator() {
        assert_eq!(
            single("Note: a: b"),
            Line::Property(Property {
                key: "Note",
                value: "a: b",
            })
        );
    }

    #[test]
    fn test_edge_line() {
        assert_eq!(
            single("Root => Playbacks/Media.HLS.MultivariantPlaylist/Total"),
            Line::Edge(EdgeLine {
                source: "Root",
                destination: Destination::Named("Playbacks"),
                histogram: HistogramRef::Explicit("Media.HLS.MultivariantPlaylist"),
                column: ColumnSpec::Named("Total"),
            })
        );
    }

    #[test]
    fn test_edge_markers() {
        assert_eq!(
            single("InitError => &/!/*"),
            Line::Edge(EdgeLine {
                source: "InitError",
                destination: Destination::FanOut,
                histogram: HistogramRef::InheritFromSource,
                column: ColumnSpec::Placeholder,
            })
        );
        assert_eq!(
            single("Playbacks => InitOK/!/%"),
            Line::Edge(EdgeLine {
                source: "Playbacks",
                destination: Destination::Named("InitOK"),
                histogram: HistogramRef::InheritFromSource,
                column: ColumnSpec::Leftover,
            })
        );
    }

    #[test]
    fn test_colon_wins_over_arrow() {
        // A colon makes any line a property line, arrow or not.
        let line = single("Root => H:A/H/Total");
        assert!(matches!(line, Line::Property(Property { key: "Root => H", .. })));
    }

    #[test]
    fn test_ignored_lines() {
        let lines = parse_lines("# comment\n\n   \nRoot -> A\nsome words").unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_spans_point_at_trimmed_lines() {
        let source = "GroupName: G1\n   Root => A/H1/Total   \n";
        let lines = parse_lines(source).unwrap();

        assert_eq!(lines[0].span().slice(source), "GroupName: G1");
        assert_eq!(lines[1].span().slice(source), "Root => A/H1/Total");
    }

    #[test]
    fn test_crlf_lines() {
        let lines = parse_lines("GroupName: G1\r\nRoot => A/H1/Total\r\n").unwrap();
        assert_eq!(lines.len(), 2);
        assert!(matches!(
            lines[0].inner(),
            Line::Property(Property { value: "G1", .. })
        ));
    }

    #[test]
    fn test_edge_with_too_few_fields() {
        let diag = first_error("Root => A/H1");

        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert_eq!(diag.message(), "malformed edge line `Root => A/H1`");
        assert_eq!(
            diag.labels()[0].message(),
            "expected 3 `/`-separated fields, found 2"
        );
    }

    #[test]
    fn test_edge_with_too_many_fields() {
        let diag = first_error("Root => A/H1/Total/Extra");
        assert_eq!(
            diag.labels()[0].message(),
            "expected 3 `/`-separated fields, found 4"
        );
    }

    #[test]
    fn test_edge_with_empty_field() {
        let diag = first_error("Root => A//Total");
        assert_eq!(diag.labels()[0].message(), "empty histogram field");
    }

    #[test]
    fn test_arrow_without_source_is_ignored() {
        // Trimming removes the space before the arrow.
        assert!(parse_lines("  => A/H1/Total").unwrap().is_empty());
    }

    #[test]
    fn test_colon_without_separator_is_ignored() {
        assert!(parse_lines("GroupName:G1").unwrap().is_empty());
        assert!(parse_lines("# see https://example.com").unwrap().is_empty());
    }

    #[test]
    fn test_colon_line_with_arrow_is_not_an_edge() {
        // Property classification wins, so a fan-out name as source is dropped.
        assert!(parse_lines("H:Timeout => A/H1/Total").unwrap().is_empty());
    }

    #[test]
    fn test_all_malformed_lines_reported() {
        let source = "GroupName: G1\nRoot => A\nA => B/H2\nA => C/!/%\n";
        let err = parse_lines(source).unwrap_err();

        assert_eq!(err.diagnostics().len(), 2);
        assert_eq!(
            err.diagnostics()[0].labels()[0].span().slice(source),
            "Root => A"
        );
        assert_eq!(
            err.diagnostics()[1].labels()[0].span().slice(source),
            "A => B/H2"
        );
    }
}
