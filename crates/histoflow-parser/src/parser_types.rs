//! Typed lines of the breakdown config.
//!
//! Marker tokens (`&`, `!`, `%`, `*`) are resolved into variants here so the
//! graph builder never compares strings against sentinels.

/// Column token ignored on fan-out lines.
pub(crate) const PLACEHOLDER_COLUMN: &str = "*";

/// One meaningful config line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Line<'src> {
    /// `Key: Value`
    Property(Property<'src>),
    /// `Source => Destination/Histogram/Column`
    Edge(EdgeLine<'src>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Property<'src> {
    pub key: &'src str,
    pub value: &'src str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EdgeLine<'src> {
    pub source: &'src str,
    pub destination: Destination<'src>,
    pub histogram: HistogramRef<'src>,
    pub column: ColumnSpec<'src>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Destination<'src> {
    Named(&'src str),
    /// `&`: one child per column of the line's histogram.
    FanOut,
}

impl<'src> Destination<'src> {
    pub fn from_token(token: &'src str) -> Self {
        match token {
            "&" => Destination::FanOut,
            name => Destination::Named(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HistogramRef<'src> {
    Explicit(&'src str),
    /// `!`: whatever histogram the source group has when the line is read.
    InheritFromSource,
}

impl<'src> HistogramRef<'src> {
    pub fn from_token(token: &'src str) -> Self {
        match token {
            "!" => HistogramRef::InheritFromSource,
            histogram => HistogramRef::Explicit(histogram),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnSpec<'src> {
    Named(&'src str),
    /// `%`: the destination receives the source's remainder.
    Leftover,
    /// `*`: conventional on fan-out lines, where the column is unused.
    Placeholder,
}

impl<'src> ColumnSpec<'src> {
    pub fn from_token(token: &'src str) -> Self {
        match token {
            "%" => ColumnSpec::Leftover,
            PLACEHOLDER_COLUMN => ColumnSpec::Placeholder,
            column => ColumnSpec::Named(column),
        }
    }
}
