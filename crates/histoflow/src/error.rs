//! Error types for histoflow operations.
//!
//! This module provides the main error type [`HistoflowError`] which wraps
//! the error conditions of a parse, compute and export run.

use std::io;

use thiserror::Error;

use histoflow_parser::ParseError;

use crate::table::TableError;

/// The main error type for histoflow operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the config source next to the structured
/// diagnostics so callers can render labelled snippets.
#[derive(Debug, Error)]
pub enum HistoflowError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Histogram table error: {0}")]
    Table(#[from] TableError),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Missing property `{0}`")]
    Property(String),

    #[error("Export error: {0}")]
    Export(#[from] serde_json::Error),
}

impl HistoflowError {
    /// Create a new `Parse` error with the associated source text.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
