//! Whole-run orchestration.
//!
//! One invocation is stateless pure function composition over one snapshot of
//! input records: ingest, then gap and seasonality analysis in parallel over
//! the shared batch, then diet penetration, the opportunity join, and finally
//! the summary and exported report. Nothing survives between runs, so two
//! runs over identical input and configuration produce byte-identical output.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::config::AnalysisConfig;
use crate::error::{Diagnostic, EngineResult};
use crate::parsing::wide_to_observations;
use crate::report::{export, report_checksum, ReportFormat};
use crate::services::{
    compute_diet_penetration, compute_gap_rates, compute_seasonality, rank_opportunities,
    summarize_market, GapMetric, MarketSummary, OpportunityScore, SeasonalityMetric,
};
use crate::sources::DataSource;
use crate::store::RecordSet;

/// Everything one run produces.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Ranked opportunities, best first.
    pub scores: Vec<OpportunityScore>,
    pub gaps: Vec<GapMetric>,
    pub seasonality: Vec<SeasonalityMetric>,
    pub summary: MarketSummary,
    /// Concatenated in stage order: gap, seasonality, ranking.
    pub diagnostics: Vec<Diagnostic>,
    pub generated_at: DateTime<Utc>,
    /// SHA-256 of the exported report bytes.
    pub checksum: String,
}

/// Fetch a wide table from a source and validate it into a [`RecordSet`].
///
/// All-or-nothing: the first malformed row, out-of-range amount or duplicate
/// key fails the whole batch.
pub async fn ingest(
    source: &dyn DataSource,
    config: &AnalysisConfig,
) -> anyhow::Result<RecordSet> {
    log::info!("Fetching wide table from '{}' source", source.name());
    let df = source.fetch().await?;

    let rows = wide_to_observations(&df)?;
    let records = RecordSet::load(rows, config.window)?;
    log::info!(
        "Loaded {} observations ({} zero-sale) for window {}",
        records.len(),
        records.zero_count(),
        records.window()
    );
    Ok(records)
}

/// Run the full analysis over a validated batch.
pub async fn run_analysis(
    records: RecordSet,
    config: &AnalysisConfig,
) -> EngineResult<AnalysisReport> {
    // Step 1: Fail fast on a bad configuration, before any computation.
    config.validate()?;

    let records = Arc::new(records);
    let min_sample_size = config.min_sample_size;

    // Step 2: Gap and seasonality analysis are independent reads of the same
    // immutable batch; run them on blocking threads and join.
    let gap_task = tokio::task::spawn_blocking({
        let records = Arc::clone(&records);
        let grouping = config.grouping.clone();
        move || compute_gap_rates(records.iter(), &grouping, min_sample_size)
    });
    let seasonality_task = tokio::task::spawn_blocking({
        let records = Arc::clone(&records);
        let grouping = config.grouping.clone();
        move || compute_seasonality(records.iter(), &grouping)
    });
    let ((gaps, gap_diagnostics), (seasonality, seasonality_diagnostics)) =
        tokio::try_join!(gap_task, seasonality_task)?;

    // Step 3: Diet penetration, then the ranker joins all three signals.
    let penetration = compute_diet_penetration(records.iter(), &config.grouping);
    let (scores, join_diagnostics) =
        rank_opportunities(&gaps, &seasonality, &penetration, &config.weights)?;

    // Step 4: Market summary, exported table, and the run checksum.
    let summary = summarize_market(records.iter());
    let exported = export(&scores, ReportFormat::Table)?;
    let checksum = report_checksum(&exported);

    let mut diagnostics = gap_diagnostics;
    diagnostics.extend(seasonality_diagnostics);
    diagnostics.extend(join_diagnostics);

    log::info!(
        "Analysis complete: {} ranked groups, {} diagnostics, checksum {}",
        scores.len(),
        diagnostics.len(),
        checksum
    );

    Ok(AnalysisReport {
        scores,
        gaps,
        seasonality,
        summary,
        diagnostics,
        generated_at: Utc::now(),
        checksum,
    })
}
