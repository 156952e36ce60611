use std::collections::{BTreeMap, HashSet};

use crate::core::domain::{
    Dimension, DimensionKey, MonthKey, MonthSpan, RawObservation, SalesObservation,
};
use crate::error::IngestError;

/// A validated, immutable batch of sales observations.
///
/// `load` is the only way to obtain one, and it is all-or-nothing: the first
/// rule violation aborts the batch with the offending row, so a `RecordSet`
/// either holds every observation of its source table or none of them.
/// Uniqueness is per (region, SKU, period) triple.
#[derive(Debug, Clone)]
pub struct RecordSet {
    records: Vec<SalesObservation>,
    window: MonthSpan,
}

impl RecordSet {
    /// Validates a melted batch against the reporting window and freezes it.
    ///
    /// Rules, checked in source-row order:
    /// - `sales_amount` must be finite (`MalformedRow`) and non-negative
    ///   (`OutOfRange`);
    /// - `period` must fall inside `window` (`OutOfRange`);
    /// - the (region, SKU, period) triple must be unique (`DuplicateKey`).
    pub fn load(rows: Vec<RawObservation>, window: MonthSpan) -> Result<Self, IngestError> {
        let mut seen: HashSet<(String, String, MonthKey)> = HashSet::with_capacity(rows.len());
        let mut records = Vec::with_capacity(rows.len());

        for raw in rows {
            let RawObservation {
                source_row,
                observation,
            } = raw;

            if !observation.sales_amount.is_finite() {
                return Err(IngestError::malformed(source_row, "sales_amount"));
            }
            if observation.sales_amount < 0.0 {
                return Err(IngestError::out_of_range(
                    source_row,
                    "sales_amount",
                    observation.sales_amount,
                ));
            }
            if !window.contains(observation.period) {
                return Err(IngestError::out_of_range(
                    source_row,
                    "period",
                    observation.period,
                ));
            }

            let key = (
                observation.region.clone(),
                observation.sku_id.clone(),
                observation.period,
            );
            if !seen.insert(key) {
                return Err(IngestError::DuplicateKey {
                    region: observation.region.clone(),
                    sku_id: observation.sku_id.clone(),
                    period: observation.period,
                    row: source_row,
                });
            }

            records.push(observation);
        }

        Ok(Self { records, window })
    }

    pub fn window(&self) -> MonthSpan {
        self.window
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[SalesObservation] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &SalesObservation> {
        self.records.iter()
    }

    /// Number of observations that recorded no sales.
    pub fn zero_count(&self) -> usize {
        self.records.iter().filter(|o| o.is_zero_sale()).count()
    }

    /// Borrowing view of the observations matching `predicate`.
    ///
    /// Observations are not cloned; the view holds references into this set.
    pub fn filter<P>(&self, predicate: P) -> RecordView<'_>
    where
        P: Fn(&SalesObservation) -> bool,
    {
        RecordView {
            records: self.records.iter().filter(|o| predicate(o)).collect(),
            window: self.window,
        }
    }

    /// Deterministic grouping along the given dimensions.
    pub fn group_by(&self, dims: &[Dimension]) -> BTreeMap<DimensionKey, Vec<&SalesObservation>> {
        group_observations(self.iter(), dims)
    }
}

/// A borrowed, filtered view into a [`RecordSet`].
#[derive(Debug, Clone)]
pub struct RecordView<'a> {
    records: Vec<&'a SalesObservation>,
    window: MonthSpan,
}

impl<'a> RecordView<'a> {
    pub fn window(&self) -> MonthSpan {
        self.window
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a SalesObservation> + '_ {
        self.records.iter().copied()
    }

    /// Narrows this view further. Still no cloning.
    pub fn filter<P>(&self, predicate: P) -> RecordView<'a>
    where
        P: Fn(&SalesObservation) -> bool,
    {
        RecordView {
            records: self
                .records
                .iter()
                .copied()
                .filter(|o| predicate(o))
                .collect(),
            window: self.window,
        }
    }

    /// Deterministic grouping along the given dimensions.
    pub fn group_by(&self, dims: &[Dimension]) -> BTreeMap<DimensionKey, Vec<&'a SalesObservation>> {
        group_observations(self.iter(), dims)
    }
}

/// Groups observations by their values along `dims`.
///
/// A `BTreeMap` keyed by the ordered value tuple makes iteration order (and
/// therefore every downstream metric listing) independent of input order.
pub fn group_observations<'a, I>(
    records: I,
    dims: &[Dimension],
) -> BTreeMap<DimensionKey, Vec<&'a SalesObservation>>
where
    I: IntoIterator<Item = &'a SalesObservation>,
{
    let mut groups: BTreeMap<DimensionKey, Vec<&'a SalesObservation>> = BTreeMap::new();
    for obs in records {
        groups
            .entry(DimensionKey::from_observation(obs, dims))
            .or_default()
            .push(obs);
    }
    groups
}
