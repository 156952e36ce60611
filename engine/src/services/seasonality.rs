//! Seasonality scoring over monthly sales series.
//!
//! For each group the scorer aggregates sales into one total per observed
//! month, then characterizes the series: mean level, sample standard
//! deviation, coefficient of variation, and the peak/trough months. A group
//! seen in fewer than two months cannot support any variation measure; such
//! groups are flagged low-confidence instead of producing NaN.

use serde::ser::Serializer;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::core::domain::{Dimension, DimensionKey, MonthKey, SalesObservation};
use crate::error::Diagnostic;
use crate::store::group_observations;

/// Ratio between the peak and trough monthly totals.
///
/// A trough of exactly zero makes the ratio infinite; that case is carried
/// as an explicit variant rather than an IEEE infinity so exports can render
/// it deliberately (`inf`) and consumers cannot mistake it for a number that
/// happened to overflow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PeakTroughRatio {
    Finite(f64),
    Infinite,
}

impl PeakTroughRatio {
    pub fn of(peak: f64, trough: f64) -> Self {
        if trough == 0.0 {
            Self::Infinite
        } else {
            Self::Finite(peak / trough)
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Self::Infinite)
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Finite(v) => *v,
            Self::Infinite => f64::INFINITY,
        }
    }
}

impl fmt::Display for PeakTroughRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(v) => write!(f, "{v}"),
            Self::Infinite => f.write_str("inf"),
        }
    }
}

impl Serialize for PeakTroughRatio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Finite(v) => serializer.serialize_f64(*v),
            Self::Infinite => serializer.serialize_str("inf"),
        }
    }
}

/// Seasonality profile of one dimension group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalityMetric {
    pub key: DimensionKey,
    /// Arithmetic mean of the monthly totals.
    pub mean: f64,
    /// Sample standard deviation (n - 1); `None` below two periods.
    pub stddev: Option<f64>,
    /// `stddev / mean`; `None` below two periods or when the mean is zero.
    pub coefficient_of_variation: Option<f64>,
    pub peak_period: MonthKey,
    pub trough_period: MonthKey,
    pub peak_to_trough_ratio: PeakTroughRatio,
    /// Distinct months with at least one observation for this group.
    pub periods_observed: usize,
    /// Set when fewer than two periods back the numbers.
    pub low_confidence: bool,
}

/// Compute seasonality metrics per group along `grouping`.
///
/// Every group yields a metric; thin ones are additionally reported as
/// [`Diagnostic::LowConfidenceSeasonality`]. Metrics come back sorted by
/// key. Peak and trough ties resolve to the earliest month.
pub fn compute_seasonality<'a, I>(
    records: I,
    grouping: &[Dimension],
) -> (Vec<SeasonalityMetric>, Vec<Diagnostic>)
where
    I: IntoIterator<Item = &'a SalesObservation>,
{
    let groups = group_observations(records, grouping);
    let mut metrics = Vec::with_capacity(groups.len());
    let mut diagnostics = Vec::new();

    for (key, members) in groups {
        let mut monthly: BTreeMap<MonthKey, f64> = BTreeMap::new();
        for obs in members {
            *monthly.entry(obs.period).or_insert(0.0) += obs.sales_amount;
        }

        let periods_observed = monthly.len();
        let totals: Vec<f64> = monthly.values().copied().collect();
        let mean = totals.iter().sum::<f64>() / periods_observed as f64;

        let stddev = if periods_observed >= 2 {
            let variance = totals.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
                / (periods_observed - 1) as f64;
            Some(variance.sqrt())
        } else {
            None
        };

        let coefficient_of_variation = match stddev {
            Some(sd) if mean != 0.0 => Some(sd / mean),
            _ => None,
        };

        // BTreeMap iteration is chronological, so strict comparisons keep
        // the earliest month on ties.
        let (mut peak_period, mut peak_total) = (MonthKey::new(0, 1), f64::NEG_INFINITY);
        let (mut trough_period, mut trough_total) = (MonthKey::new(0, 1), f64::INFINITY);
        for (&month, &total) in &monthly {
            if total > peak_total {
                peak_period = month;
                peak_total = total;
            }
            if total < trough_total {
                trough_period = month;
                trough_total = total;
            }
        }

        let low_confidence = periods_observed < 2;
        if low_confidence {
            log::debug!(
                "seasonality: group '{key}' spans only {periods_observed} period(s)"
            );
            diagnostics.push(Diagnostic::LowConfidenceSeasonality {
                key: key.clone(),
                periods: periods_observed,
            });
        }

        metrics.push(SeasonalityMetric {
            key,
            mean,
            stddev,
            coefficient_of_variation,
            peak_period,
            trough_period,
            peak_to_trough_ratio: PeakTroughRatio::of(peak_total, trough_total),
            periods_observed,
            low_confidence,
        });
    }

    (metrics, diagnostics)
}
