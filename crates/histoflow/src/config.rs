//! Configuration types for histoflow runs.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! TOML; every field has a default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining output and flow settings.
//! - [`OutputConfig`] - Which [`ExportFormat`] to render and whether to pretty-print.
//! - [`FlowConfig`] - Overrides for the flow calculation, such as the row label.
//!
//! # Example
//!
//! ```
//! # use histoflow::{config::AppConfig, export::ExportFormat};
//! let config = AppConfig::default();
//! assert_eq!(config.output().format(), ExportFormat::Triples);
//! assert!(config.output().pretty());
//! assert!(config.flow().group_name().is_none());
//! ```

use serde::Deserialize;

use crate::export::ExportFormat;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Output configuration section.
    #[serde(default)]
    output: OutputConfig,

    /// Flow calculation section.
    #[serde(default)]
    flow: FlowConfig,
}

impl AppConfig {
    pub fn new(output: OutputConfig, flow: FlowConfig) -> Self {
        Self { output, flow }
    }

    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    pub fn flow(&self) -> &FlowConfig {
        &self.flow
    }

    /// Returns a copy of this configuration rendering `format`.
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.output.format = format;
        self
    }
}

/// Output rendering settings.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    format: ExportFormat,

    #[serde(default = "default_pretty")]
    pretty: bool,
}

fn default_pretty() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            pretty: default_pretty(),
        }
    }
}

impl OutputConfig {
    pub fn new(format: ExportFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    /// Whether JSON output is indented.
    pub fn pretty(&self) -> bool {
        self.pretty
    }
}

/// Flow calculation settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlowConfig {
    /// Row label to read instead of the config's `GroupName` property.
    #[serde(default)]
    group_name: Option<String>,
}

impl FlowConfig {
    pub fn new(group_name: Option<String>) -> Self {
        Self { group_name }
    }

    pub fn group_name(&self) -> Option<&str> {
        self.group_name.as_deref()
    }
}
