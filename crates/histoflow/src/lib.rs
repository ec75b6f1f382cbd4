//! Histoflow - balanced Sankey flows from histogram group breakdowns.
//!
//! A breakdown config names groups and says which histogram column each
//! group's size is read from. Histoflow parses the config into a group
//! graph, balances every group against its children and exports the
//! resulting weighted edges as JSON.

pub mod config;
pub mod export;
pub mod flow;
pub mod table;

mod error;

pub use histoflow_core::{group, histogram, identifier};
pub use histoflow_parser::{ParsedConfig, Properties};

pub use error::HistoflowError;

use log::{debug, info, trace, warn};

use histoflow_core::histogram::HistogramSource;

use config::AppConfig;
use flow::Flow;

/// Builder for running histoflow pipelines.
///
/// # Examples
///
/// ```rust
/// use histoflow::{FlowBuilder, config::AppConfig, table::{HistogramTable, TableSource}};
///
/// let mut tables = TableSource::new();
/// tables.insert(
///     HistogramTable::new("H1", Vec::new())
///         .with_row("G1", 100, Vec::new())
///         .expect("row width matches"),
/// );
///
/// let builder = FlowBuilder::new(AppConfig::default());
/// let config = builder
///     .parse("GroupName: G1\nRoot => A/H1/Total", &tables)
///     .expect("Failed to parse");
/// let flows = builder.compute(&config, &tables).expect("Failed to compute");
/// assert_eq!(flows.len(), 1);
/// assert_eq!(flows[0].amount, 100);
/// ```
#[derive(Default)]
pub struct FlowBuilder {
    config: AppConfig,
}

impl FlowBuilder {
    /// Create a new flow builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse config text into a group graph.
    ///
    /// Warnings raised while building the graph are logged and kept on the
    /// returned [`ParsedConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`HistoflowError::Parse`] if any edge or property line is
    /// malformed.
    pub fn parse(
        &self,
        source: &str,
        histograms: &dyn HistogramSource,
    ) -> Result<ParsedConfig, HistoflowError> {
        info!("Parsing breakdown config");

        let config = histoflow_parser::parse(source, histograms)
            .map_err(|err| HistoflowError::new_parse_error(err, source))?;
        for warning in config.warnings() {
            warn!(warning:%; "Breakdown config warning");
        }

        debug!("Breakdown config parsed successfully");
        trace!(groups:? = config.groups(); "Parsed groups");
        Ok(config)
    }

    /// Balance the parsed graph against `histograms`.
    ///
    /// The row label comes from the `[flow] group_name` setting when present
    /// and from the config's `GroupName` property otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`HistoflowError::Property`] when no row label is available
    /// and [`HistoflowError::Graph`] when the config defines no `Root` group.
    pub fn compute(
        &self,
        config: &ParsedConfig,
        histograms: &dyn HistogramSource,
    ) -> Result<Vec<Flow>, HistoflowError> {
        let row = self
            .config
            .flow()
            .group_name()
            .or_else(|| config.properties().group_name())
            .ok_or_else(|| HistoflowError::Property(histoflow_parser::GROUP_NAME_KEY.to_string()))?;

        let root = config.groups().root().ok_or_else(|| {
            HistoflowError::Graph(format!(
                "no `{}` group is defined",
                group::ROOT_GROUP
            ))
        })?;

        info!(row; "Computing flows");
        let flows = flow::compute(config.groups(), root.name(), row, histograms);
        info!(flows = flows.len(); "Flows computed");
        Ok(flows)
    }

    /// Serialize flows in the configured output format.
    ///
    /// # Errors
    ///
    /// Returns [`HistoflowError::Export`] if serialization fails.
    pub fn export(&self, flows: &[Flow]) -> Result<String, HistoflowError> {
        let output = self.config.output();
        debug!(format:% = output.format(), pretty = output.pretty(); "Exporting flows");
        Ok(export::to_json(flows, output.format(), output.pretty())?)
    }

    /// Parse, compute and export in one call.
    ///
    /// # Errors
    ///
    /// Returns the first error of [`FlowBuilder::parse`],
    /// [`FlowBuilder::compute`] or [`FlowBuilder::export`].
    pub fn run(
        &self,
        source: &str,
        histograms: &dyn HistogramSource,
    ) -> Result<String, HistoflowError> {
        let config = self.parse(source, histograms)?;
        let flows = self.compute(&config, histograms)?;
        self.export(&flows)
    }
}
