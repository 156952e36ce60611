//! Error types and non-fatal diagnostics for the analysis engine.
//!
//! Two failure families exist side by side:
//!
//! - Hard errors ([`IngestError`], [`ConfigError`], folded into
//!   [`EngineError`]) abort the run. Ingestion is all-or-nothing: a single
//!   bad row rejects the whole batch rather than silently skewing
//!   denominators downstream.
//! - [`Diagnostic`] values are data-quality findings (thin groups, sparse
//!   series, join drops). They never stop a run; every stage collects them
//!   and the pipeline returns the full list alongside the results.

use serde::Serialize;
use std::fmt;

use crate::core::domain::{DimensionKey, MonthKey};

/// Result type for whole-pipeline operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Fatal errors raised while loading a batch into the record store.
///
/// Table-shape variants name the offending column; row-level variants name
/// the offending row (1-based, header excluded) so the file can be fixed
/// without guesswork.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IngestError {
    /// A required column is absent from the source table.
    #[error("Source table lacks required column(s): {column}")]
    MissingColumn { column: String },

    /// A required column is present but holds the wrong kind of data.
    #[error("Column '{column}' holds {found} data where {expected} was expected")]
    MistypedColumn {
        column: String,
        expected: String,
        found: String,
    },

    /// An identifier field is empty or a sales cell is not numeric.
    #[error("Malformed row {row}: field '{field}' is missing or not parseable")]
    MalformedRow { row: usize, field: String },

    /// Two rows claim the same (region, SKU, period) observation.
    #[error("Duplicate observation for region '{region}', SKU '{sku_id}', period {period} at row {row}")]
    DuplicateKey {
        region: String,
        sku_id: String,
        period: MonthKey,
        row: usize,
    },

    /// A value violates its domain: negative sales or a period outside the
    /// configured reporting window.
    #[error("Out-of-range value in row {row}: field '{field}' = {value}")]
    OutOfRange {
        row: usize,
        field: String,
        value: String,
    },
}

impl IngestError {
    /// Create a malformed-row error.
    pub fn malformed(row: usize, field: impl Into<String>) -> Self {
        Self::MalformedRow {
            row,
            field: field.into(),
        }
    }

    /// Create an out-of-range error.
    pub fn out_of_range(row: usize, field: impl Into<String>, value: impl ToString) -> Self {
        Self::OutOfRange {
            row,
            field: field.into(),
            value: value.to_string(),
        }
    }
}

/// Fatal configuration errors, checked before any data is touched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read or parsed.
    #[error("Failed to load configuration from {path}: {message}")]
    Unreadable { path: String, message: String },

    /// Score weights must sum to 1.0 (within a small tolerance).
    #[error("Invalid score weights: sum is {sum}, expected 1.0")]
    InvalidWeights { sum: f64 },

    /// At least one grouping dimension is required.
    #[error("Grouping dimensions must not be empty")]
    EmptyGroupingDimensions,

    /// The reporting window covers no months.
    #[error("Empty reporting window: {start} is after {end}")]
    EmptyWindow { start: MonthKey, end: MonthKey },
}

/// Top-level error for a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// DataFrame construction or serialization failed.
    #[error("Table operation failed: {0}")]
    Table(#[from] polars::error::PolarsError),

    /// A spawned analysis task panicked or was cancelled.
    #[error("Analysis task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// The stage a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricSource {
    Gap,
    Seasonality,
    Penetration,
}

impl MetricSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gap => "gap",
            Self::Seasonality => "seasonality",
            Self::Penetration => "penetration",
        }
    }
}

impl fmt::Display for MetricSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal data-quality finding collected during analysis.
///
/// Diagnostics surface what the metrics silently leave out: groups below the
/// sample floor, series too short to score, and keys dropped by the ranking
/// join. Consumers get the complete list with every report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A group had fewer records than `min_sample_size` and was excluded
    /// from the gap metrics.
    InsufficientSample {
        key: DimensionKey,
        observed: usize,
        required: usize,
    },

    /// A group had fewer than two periods of data; its variation measures
    /// are undefined.
    LowConfidenceSeasonality { key: DimensionKey, periods: usize },

    /// A key present in at least one metric set was absent from another and
    /// was excluded from the ranking join.
    JoinKeyMissing {
        key: DimensionKey,
        missing_from: MetricSource,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientSample {
                key,
                observed,
                required,
            } => write!(
                f,
                "insufficient sample for '{key}': {observed} records, need {required}"
            ),
            Self::LowConfidenceSeasonality { key, periods } => write!(
                f,
                "low-confidence seasonality for '{key}': only {periods} period(s)"
            ),
            Self::JoinKeyMissing { key, missing_from } => write!(
                f,
                "'{key}' dropped from ranking: missing from {missing_from} metrics"
            ),
        }
    }
}
