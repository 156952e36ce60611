//! CMI Report Runner
//!
//! Command-line entry point for one analysis run: reads the wide monthly
//! sales CSV, runs the full pipeline, and writes the ranked report as
//! delimited text to a file or stdout. Diagnostics go to stderr so the
//! report stream stays clean for downstream automation.
//!
//! # Usage
//!
//! ```bash
//! # Write the ranked report to a file
//! cargo run --bin cmi-report -- sales_2024.csv report.csv
//!
//! # Or pipe it from stdout
//! cargo run --bin cmi-report -- sales_2024.csv > report.csv
//! ```
//!
//! # Environment Variables
//!
//! - `CMI_CONFIG`: Path to the analysis TOML (default: search the standard
//!   locations, falling back to built-in defaults)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::io::Write;

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use cmi_rust::config::AnalysisConfig;
use cmi_rust::pipeline::{ingest, run_analysis};
use cmi_rust::report::{export, ReportFormat};
use cmi_rust::sources::CsvFileSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    let args: Vec<String> = env::args().collect();
    let input = args
        .get(1)
        .ok_or_else(|| anyhow::anyhow!("Usage: cmi-report <input.csv> [output.csv]"))?;
    let output = args.get(2);

    let config = match env::var("CMI_CONFIG") {
        Ok(path) => AnalysisConfig::from_file(&path)?,
        Err(_) => AnalysisConfig::from_default_location()?,
    };
    info!(
        "Analyzing window {} grouped by {} dimension(s)",
        config.window,
        config.grouping.len()
    );

    let source = CsvFileSource::new(input.as_str());
    let records = ingest(&source, &config).await?;
    let report = run_analysis(records, &config).await?;

    for diagnostic in &report.diagnostics {
        eprintln!("warning: {diagnostic}");
    }

    let bytes = export(&report.scores, ReportFormat::Table)?;
    match output {
        Some(path) => {
            std::fs::write(path, &bytes)
                .with_context(|| format!("Failed to write report to {path}"))?;
            info!("Wrote {} ranked groups to {}", report.scores.len(), path);
        }
        None => {
            std::io::stdout()
                .write_all(&bytes)
                .context("Failed to write report to stdout")?;
        }
    }
    info!("Run checksum: {}", report.checksum);

    Ok(())
}
