//! Command-line argument definitions for the histoflow CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`].

use clap::Parser;

use histoflow::export::ExportFormat;

/// Command-line arguments for the histoflow tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the breakdown config
    #[arg(help = "Path to the breakdown config")]
    pub input: String,

    /// Histogram table files (TOML); later files replace earlier tables
    #[arg(short, long = "data", required = true, num_args = 1..)]
    pub data: Vec<String>,

    /// Path to the output JSON file, stdout when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output shape, overriding the configuration file
    #[arg(short, long)]
    pub format: Option<ExportFormat>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
