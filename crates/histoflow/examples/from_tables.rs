//! Example: Balancing flows against tables built in code
//!
//! This example builds a histogram source programmatically instead of
//! loading it from TOML, then prints the flows as a node/edge graph.

use histoflow::{
    FlowBuilder,
    config::AppConfig,
    export::ExportFormat,
    table::{HistogramTable, TableSource},
};

const CONFIG: &str = "\
GroupName: Enabled
Root => Sessions/Sessions/Total
Sessions => Errors/Errors/Total
Sessions => Healthy/!/%
Errors => &/Errors/*
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut histograms = TableSource::new();
    histograms.insert(HistogramTable::new("Sessions", Vec::new()).with_row("Enabled", 1_000, Vec::new())?);
    histograms.insert(
        HistogramTable::new("Errors", vec!["Timeout".to_string(), "Crash".to_string()])
            .with_row("Enabled", 90, vec![60, 30])?,
    );

    let builder = FlowBuilder::new(AppConfig::default().with_format(ExportFormat::Graph));
    let json = builder.run(CONFIG, &histograms)?;

    println!("{json}");
    Ok(())
}
