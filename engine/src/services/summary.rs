//! Dataset-level market summary.
//!
//! One pass over a validated batch producing the headline numbers a run
//! report opens with: totals, zero-sale share, central tendency of the sales
//! distribution, regional and manufacturer concentration (with HHI), and the
//! whole-market peak/trough months.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::domain::{MonthKey, SalesObservation};
use crate::services::seasonality::PeakTroughRatio;

/// Sales share of one label (a region or a manufacturer) within the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionShare {
    pub label: String,
    pub sales: f64,
    /// Fraction of total batch sales, `[0, 1]`.
    pub share: f64,
}

/// Headline metrics for a whole batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSummary {
    pub total_records: usize,
    pub zero_records: usize,
    /// `zero_records / total_records`; 0 for an empty batch.
    pub zero_share: f64,
    pub total_sales: f64,
    pub mean_sales: f64,
    pub median_sales: f64,
    /// Descending by share, ties by label.
    pub region_shares: Vec<DimensionShare>,
    /// Herfindahl-Hirschman index over region shares, `(0, 1]`.
    pub region_hhi: f64,
    pub manufacturer_shares: Vec<DimensionShare>,
    pub manufacturer_hhi: f64,
    /// Month with the highest market-wide total; earliest month wins ties.
    pub peak_month: Option<MonthKey>,
    pub trough_month: Option<MonthKey>,
    /// Peak over trough monthly totals; `None` for an empty batch.
    pub seasonality_ratio: Option<PeakTroughRatio>,
}

/// Summarize a batch of validated observations.
pub fn summarize_market<'a, I>(records: I) -> MarketSummary
where
    I: IntoIterator<Item = &'a SalesObservation>,
{
    let records: Vec<&SalesObservation> = records.into_iter().collect();

    let total_records = records.len();
    let zero_records = records.iter().filter(|obs| obs.is_zero_sale()).count();
    let zero_share = if total_records > 0 {
        zero_records as f64 / total_records as f64
    } else {
        0.0
    };

    let amounts: Vec<f64> = records.iter().map(|obs| obs.sales_amount).collect();
    let total_sales: f64 = amounts.iter().sum();
    let mean_sales = if !amounts.is_empty() {
        total_sales / amounts.len() as f64
    } else {
        0.0
    };

    let mut sorted_amounts = amounts.clone();
    sorted_amounts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median_sales = if !sorted_amounts.is_empty() {
        if sorted_amounts.len() % 2 == 0 {
            (sorted_amounts[sorted_amounts.len() / 2 - 1]
                + sorted_amounts[sorted_amounts.len() / 2])
                / 2.0
        } else {
            sorted_amounts[sorted_amounts.len() / 2]
        }
    } else {
        0.0
    };

    let region_shares = shares_by(&records, total_sales, |obs| &obs.region);
    let manufacturer_shares = shares_by(&records, total_sales, |obs| &obs.manufacturer);
    let region_hhi = hhi(&region_shares);
    let manufacturer_hhi = hhi(&manufacturer_shares);

    let mut monthly_totals: BTreeMap<MonthKey, f64> = BTreeMap::new();
    for obs in &records {
        *monthly_totals.entry(obs.period).or_insert(0.0) += obs.sales_amount;
    }

    let (mut peak_month, mut trough_month, mut seasonality_ratio) = (None, None, None);
    if !monthly_totals.is_empty() {
        let (mut peak_period, mut peak_total) = (MonthKey::new(0, 1), f64::NEG_INFINITY);
        let (mut trough_period, mut trough_total) = (MonthKey::new(0, 1), f64::INFINITY);
        for (&period, &total) in &monthly_totals {
            // Strict comparisons keep the earliest month on equal totals.
            if total > peak_total {
                peak_period = period;
                peak_total = total;
            }
            if total < trough_total {
                trough_period = period;
                trough_total = total;
            }
        }
        peak_month = Some(peak_period);
        trough_month = Some(trough_period);
        seasonality_ratio = Some(PeakTroughRatio::of(peak_total, trough_total));
    }

    MarketSummary {
        total_records,
        zero_records,
        zero_share,
        total_sales,
        mean_sales,
        median_sales,
        region_shares,
        region_hhi,
        manufacturer_shares,
        manufacturer_hhi,
        peak_month,
        trough_month,
        seasonality_ratio,
    }
}

fn shares_by<'a, F>(
    records: &[&'a SalesObservation],
    total_sales: f64,
    label_of: F,
) -> Vec<DimensionShare>
where
    F: Fn(&'a SalesObservation) -> &'a str,
{
    let mut by_label: BTreeMap<&str, f64> = BTreeMap::new();
    for obs in records {
        *by_label.entry(label_of(obs)).or_insert(0.0) += obs.sales_amount;
    }

    let mut shares: Vec<DimensionShare> = by_label
        .into_iter()
        .map(|(label, sales)| DimensionShare {
            label: label.to_string(),
            sales,
            share: if total_sales > 0.0 {
                sales / total_sales
            } else {
                0.0
            },
        })
        .collect();

    shares.sort_by(|a, b| {
        b.share
            .partial_cmp(&a.share)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.label.cmp(&b.label))
    });
    shares
}

/// Sum of squared shares; 1.0 means a single player holds the market.
fn hhi(shares: &[DimensionShare]) -> f64 {
    shares.iter().map(|s| s.share * s.share).sum()
}
