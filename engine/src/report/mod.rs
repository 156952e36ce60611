//! Serialization of ranked results for downstream consumers.

pub mod exporter;

pub use exporter::{export, report_checksum, scores_to_dataframe, ReportFormat};
