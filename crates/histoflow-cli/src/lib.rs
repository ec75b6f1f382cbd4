//! CLI logic for the histoflow tool.
//!
//! Reads a breakdown config and histogram tables from disk, runs the
//! histoflow pipeline and writes the resulting JSON.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs,
    io::{self, Write},
};

use log::info;

use histoflow::{FlowBuilder, HistoflowError, table::TableSource};

/// Run the histoflow CLI application
///
/// # Errors
///
/// Returns `HistoflowError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Histogram table errors
/// - Parsing errors
/// - A config without a `Root` group or a row label
pub fn run(args: &Args) -> Result<(), HistoflowError> {
    info!(
        input_path = args.input,
        tables = args.data.len();
        "Processing breakdown"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(format) = args.format {
        app_config = app_config.with_format(format);
    }

    let histograms = load_tables(&args.data)?;
    let source = fs::read_to_string(&args.input)?;

    let builder = FlowBuilder::new(app_config);
    let json = builder.run(&source, &histograms)?;

    match &args.output {
        Some(path) => {
            fs::write(path, json)?;
            info!(output_file = path; "Flows exported successfully");
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }

    Ok(())
}

/// Merge every table file into one source, later files winning.
fn load_tables(paths: &[String]) -> Result<TableSource, HistoflowError> {
    let mut histograms = TableSource::new();
    for path in paths {
        info!(path; "Loading histogram tables");
        let content = fs::read_to_string(path)?;
        histograms.merge(TableSource::from_toml_str(&content)?);
    }
    Ok(histograms)
}
