//! Distribution-gap analysis.
//!
//! A "gap" is an observation with zero sales: the SKU was listed for the
//! month but nothing moved. The gap rate of a group is the share of its
//! observations that are zero, the core availability signal of the engine.

use serde::Serialize;

use crate::core::domain::{Dimension, DimensionKey, SalesObservation};
use crate::error::Diagnostic;
use crate::store::group_observations;

/// Zero-sales share for one dimension group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapMetric {
    pub key: DimensionKey,
    pub total_records: usize,
    pub zero_records: usize,
    /// `zero_records / total_records`, always within `[0, 1]`.
    pub gap_rate: f64,
}

/// Compute gap rates per group along `grouping`.
///
/// Groups with fewer than `min_sample_size` records are excluded from the
/// metric list and reported as diagnostics instead, so every input group is
/// accounted for exactly once. Metrics come back sorted by key.
pub fn compute_gap_rates<'a, I>(
    records: I,
    grouping: &[Dimension],
    min_sample_size: usize,
) -> (Vec<GapMetric>, Vec<Diagnostic>)
where
    I: IntoIterator<Item = &'a SalesObservation>,
{
    let groups = group_observations(records, grouping);
    let mut metrics = Vec::with_capacity(groups.len());
    let mut diagnostics = Vec::new();

    for (key, members) in groups {
        let total_records = members.len();
        if total_records < min_sample_size {
            log::debug!(
                "gap analysis: group '{key}' has {total_records} records, below floor {min_sample_size}"
            );
            diagnostics.push(Diagnostic::InsufficientSample {
                key,
                observed: total_records,
                required: min_sample_size,
            });
            continue;
        }

        let zero_records = members.iter().filter(|o| o.is_zero_sale()).count();
        metrics.push(GapMetric {
            key,
            total_records,
            zero_records,
            gap_rate: zero_records as f64 / total_records as f64,
        });
    }

    (metrics, diagnostics)
}
