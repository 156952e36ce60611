//! Ranked report serialization.
//!
//! Pure serialization of [`OpportunityScore`] rows. No business logic lives
//! here: the exporter writes rows in exactly the order the ranker produced
//! them, and the column names and order are a stable contract for downstream
//! automation.

use polars::prelude::*;
use sha2::{Digest, Sha256};

use crate::services::opportunity::OpportunityScore;

/// Output encodings for the ranked report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Canonical comma-separated table with a header row.
    Table,
    /// Delimited text with a caller-chosen separator byte.
    Delimited { separator: u8 },
}

/// Build the in-memory report table for a presentation layer.
///
/// Row order follows the input slice; column names and order never change.
pub fn scores_to_dataframe(scores: &[OpportunityScore]) -> PolarsResult<DataFrame> {
    let ranks: Vec<u32> = scores.iter().map(|s| s.rank as u32).collect();
    let keys: Vec<String> = scores.iter().map(|s| s.key.to_string()).collect();
    let gap: Vec<f64> = scores.iter().map(|s| s.gap_component).collect();
    let seasonality: Vec<f64> = scores.iter().map(|s| s.seasonality_component).collect();
    let penetration: Vec<f64> = scores.iter().map(|s| s.penetration_component).collect();
    let composite: Vec<f64> = scores.iter().map(|s| s.composite_score).collect();

    DataFrame::new(vec![
        Column::new("rank".into(), ranks),
        Column::new("dimension_key".into(), keys),
        Column::new("gap_component".into(), gap),
        Column::new("seasonality_component".into(), seasonality),
        Column::new("penetration_component".into(), penetration),
        Column::new("composite_score".into(), composite),
    ])
}

/// Serialize ranked scores to delimited text.
///
/// Identical input in identical order produces byte-identical output, which
/// is what makes whole-pipeline runs reproducible.
pub fn export(scores: &[OpportunityScore], format: ReportFormat) -> PolarsResult<Vec<u8>> {
    let mut df = scores_to_dataframe(scores)?;
    let separator = match format {
        ReportFormat::Table => b',',
        ReportFormat::Delimited { separator } => separator,
    };

    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .with_separator(separator)
        .finish(&mut df)?;
    Ok(buffer)
}

/// Calculate SHA-256 checksum of an exported report.
///
/// # Arguments
/// * `report` - exported report bytes
///
/// # Returns
/// Hexadecimal string representation of the SHA-256 hash.
pub fn report_checksum(report: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(report);
    let result = hasher.finalize();
    hex::encode(result)
}
