//! # Histoflow Parser
//!
//! Parser for the histoflow group breakdown language. A config is a list of
//! lines:
//!
//! ```text
//! GroupName: Enabled_20250131
//!
//! Root => Playbacks/Media.HLS.MultivariantPlaylist/Total
//! Playbacks => InitError/Media.HLS.InitializationError/Total
//! Playbacks => InitOK/!/%
//! InitError => &/Media.HLS.InitializationError/*
//! ```
//!
//! `Key: Value` lines set properties; `Source => Destination/Histogram/Column`
//! lines add edges. `&` fans out into one child per histogram column, `!`
//! inherits the source group's histogram and `%` marks the destination as
//! the remainder of the source. Other lines are ignored.
//!
//! ## Usage
//!
//! ```
//! # use histoflow_parser::{parse, ParseError};
//! # use histoflow_core::histogram::HistogramSource;
//! struct NoColumns;
//!
//! impl HistogramSource for NoColumns {
//!     fn columns(&self, _histogram: &str) -> Vec<String> {
//!         Vec::new()
//!     }
//!     fn lookup(&self, _histogram: &str, _row: &str, _column: &str) -> i64 {
//!         -1
//!     }
//! }
//!
//! fn main() -> Result<(), ParseError> {
//!     let config = parse("GroupName: G1\nRoot => A/H1/Total", &NoColumns)?;
//!     assert_eq!(config.properties().group_name(), Some("G1"));
//!     assert_eq!(config.groups().len(), 2);
//!     Ok(())
//! }
//! ```

pub mod error;

mod elaborate;
mod parser;
mod parser_types;
mod properties;
mod span;

pub use error::ParseError;
pub use properties::{GROUP_NAME_KEY, Properties};
pub use span::{Span, Spanned};

use log::trace;

use histoflow_core::{group::GroupGraph, histogram::HistogramSource};

use elaborate::Builder;
use error::Diagnostic;

/// The result of parsing a config: its group graph, its properties and any
/// warnings raised while building the graph.
#[derive(Debug, Clone)]
pub struct ParsedConfig {
    groups: GroupGraph,
    properties: Properties,
    warnings: Vec<Diagnostic>,
}

impl ParsedConfig {
    pub(crate) fn new(groups: GroupGraph, properties: Properties, warnings: Vec<Diagnostic>) -> Self {
        Self {
            groups,
            properties,
            warnings,
        }
    }

    pub fn groups(&self) -> &GroupGraph {
        &self.groups
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Non-fatal findings, such as groups whose depth was raised after
    /// their children were declared.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn into_parts(self) -> (GroupGraph, Properties, Vec<Diagnostic>) {
        (self.groups, self.properties, self.warnings)
    }
}

/// Parse config text into a group graph.
///
/// 1. **Parse** - Classify lines and type their fields
/// 2. **Elaborate** - Build the group graph, expanding fan-outs through
///    `histograms`
///
/// # Errors
///
/// Returns a [`ParseError`] listing every malformed edge or property line.
/// `histograms` is not consulted when the config has errors.
pub fn parse(source: &str, histograms: &dyn HistogramSource) -> Result<ParsedConfig, ParseError> {
    let lines = parser::parse_lines(source)?;
    trace!(lines:? = lines; "Parsed lines");

    Builder::new(histograms).build(&lines)
}
