//! Segment penetration and share-of-market analysis.
//!
//! Penetration here is measured from the sales data itself: the diet share
//! of a group's sales is the third input to the opportunity ranking (a low
//! share marks white space), and per-region manufacturer shares expose
//! concentration risk.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::domain::{DietFlag, Dimension, DimensionKey, SalesObservation};
use crate::store::group_observations;

/// Share above which a single manufacturer dominates its region.
pub const CONCENTRATION_RISK_THRESHOLD: f64 = 0.70;

/// Sales share of one label (e.g. a manufacturer) within a group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareMetric {
    pub key: DimensionKey,
    pub label: String,
    pub sales: f64,
    /// Share of the group total, in `[0, 1]`; 0 when the group sold nothing.
    pub share: f64,
    pub concentration_risk: bool,
}

/// Diet share of sales per group along `grouping`.
///
/// A group with zero total sales has zero penetration by definition.
pub fn compute_diet_penetration<'a, I>(
    records: I,
    grouping: &[Dimension],
) -> BTreeMap<DimensionKey, f64>
where
    I: IntoIterator<Item = &'a SalesObservation>,
{
    let groups = group_observations(records, grouping);
    let mut penetration = BTreeMap::new();

    for (key, members) in groups {
        let total: f64 = members.iter().map(|o| o.sales_amount).sum();
        let diet: f64 = members
            .iter()
            .filter(|o| o.diet == DietFlag::Diet)
            .map(|o| o.sales_amount)
            .sum();

        let share = if total > 0.0 { diet / total } else { 0.0 };
        penetration.insert(key, share);
    }

    penetration
}

/// Manufacturer share of sales per region, descending within each region.
///
/// Shares above [`CONCENTRATION_RISK_THRESHOLD`] are flagged and logged;
/// a region that concentrated signals both supply risk and little room for
/// the leader to grow.
pub fn compute_manufacturer_shares<'a, I>(records: I) -> Vec<ShareMetric>
where
    I: IntoIterator<Item = &'a SalesObservation>,
{
    let regions = group_observations(records, &[Dimension::Region]);
    let mut metrics = Vec::new();

    for (key, members) in regions {
        let region_total: f64 = members.iter().map(|o| o.sales_amount).sum();

        let mut by_manufacturer: BTreeMap<&str, f64> = BTreeMap::new();
        for obs in &members {
            *by_manufacturer.entry(obs.manufacturer.as_str()).or_insert(0.0) += obs.sales_amount;
        }

        let mut region_metrics: Vec<ShareMetric> = by_manufacturer
            .into_iter()
            .map(|(label, sales)| {
                let share = if region_total > 0.0 {
                    sales / region_total
                } else {
                    0.0
                };
                let concentration_risk = share > CONCENTRATION_RISK_THRESHOLD;
                if concentration_risk {
                    log::warn!(
                        "manufacturer '{label}' holds {:.1}% of region '{key}'",
                        share * 100.0
                    );
                }
                ShareMetric {
                    key: key.clone(),
                    label: label.to_string(),
                    sales,
                    share,
                    concentration_risk,
                }
            })
            .collect();

        region_metrics.sort_by(|a, b| {
            b.share
                .partial_cmp(&a.share)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.label.cmp(&b.label))
        });
        metrics.extend(region_metrics);
    }

    metrics
}
