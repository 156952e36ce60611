//! Domain models for sales observations and reporting periods.
//!
//! This module provides the core data structures that represent the measured
//! market: calendar months, reporting windows, grouping dimensions, and the
//! narrow (one row per SKU, geography and month) sales observations.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar month, the atomic reporting period of the engine.
///
/// Source workbooks label months in `MMM'yy` form (`Jan'24`); configuration
/// files and exports use the ISO `YYYY-MM` form so that lexicographic and
/// chronological order coincide. Both spellings parse to the same key.
///
/// # Examples
///
/// ```
/// use cmi_rust::core::domain::MonthKey;
///
/// let from_label = MonthKey::parse_label("Jan'24").unwrap();
/// let from_iso: MonthKey = "2024-01".parse().unwrap();
///
/// assert_eq!(from_label, from_iso);
/// assert_eq!(from_label.to_string(), "2024-01");
/// assert_eq!(from_label.label(), "Jan'24");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    /// Creates a month key from a year and a 1-based month number.
    ///
    /// A month outside 1..=12 is a programming error and trips a debug
    /// assertion; external input goes through the parsing entry points
    /// below, which validate.
    pub fn new(year: i32, month: u32) -> Self {
        debug_assert!((1..=12).contains(&month), "month must be 1..=12, got {month}");
        Self { year, month }
    }

    /// Parses a workbook month header such as `Jan'24` or `Jan24`.
    ///
    /// Returns `None` when the label does not name a month.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmi_rust::core::domain::MonthKey;
    ///
    /// assert_eq!(MonthKey::parse_label("Dec'24"), Some(MonthKey::new(2024, 12)));
    /// assert_eq!(MonthKey::parse_label("Region"), None);
    /// ```
    pub fn parse_label(label: &str) -> Option<Self> {
        let compact: String = label.chars().filter(|c| *c != '\'' && !c.is_whitespace()).collect();
        let date = NaiveDate::parse_from_str(&format!("01{compact}"), "%d%b%y").ok()?;
        Some(Self::new(date.year(), date.month()))
    }

    /// Renders the workbook `MMM'yy` label for this month.
    pub fn label(&self) -> String {
        self.first_day().format("%b'%y").to_string()
    }

    /// Returns the first calendar day of this month.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use cmi_rust::core::domain::MonthKey;
    ///
    /// let first = MonthKey::new(2024, 7).first_day();
    /// assert_eq!(first, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
    /// ```
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(self.year, 1, 1).unwrap_or_default())
    }

    /// Returns the month immediately after this one.
    pub fn succ(&self) -> Self {
        if self.month >= 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = String;

    /// Parses the ISO `YYYY-MM` spelling, falling back to the workbook label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d") {
            return Ok(Self::new(date.year(), date.month()));
        }
        MonthKey::parse_label(trimmed)
            .ok_or_else(|| format!("unrecognized month '{trimmed}' (expected YYYY-MM or MMM'yy)"))
    }
}

impl TryFrom<String> for MonthKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(value: MonthKey) -> Self {
        value.to_string()
    }
}

/// An inclusive span of calendar months, the engine's reporting window.
///
/// # Examples
///
/// ```
/// use cmi_rust::core::domain::{MonthKey, MonthSpan};
///
/// let window = MonthSpan::new(MonthKey::new(2024, 1), MonthKey::new(2024, 12));
///
/// assert!(window.contains(MonthKey::new(2024, 6)));
/// assert!(!window.contains(MonthKey::new(2025, 1)));
/// assert_eq!(window.months().len(), 12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSpan {
    pub start: MonthKey,
    pub end: MonthKey,
}

impl MonthSpan {
    /// Creates a new inclusive span. A span whose `start` sorts after its
    /// `end` is considered empty and is rejected by configuration validation.
    pub fn new(start: MonthKey, end: MonthKey) -> Self {
        Self { start, end }
    }

    /// Returns `true` when the month falls inside the span (inclusive).
    pub fn contains(&self, month: MonthKey) -> bool {
        self.start <= month && month <= self.end
    }

    /// Returns `true` when the span covers no months at all.
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Materializes every month in the span, in chronological order.
    pub fn months(&self) -> Vec<MonthKey> {
        let mut months = Vec::new();
        let mut current = self.start;
        while current <= self.end {
            months.push(current);
            current = current.succ();
        }
        months
    }
}

impl fmt::Display for MonthSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Regular/diet split of a SKU, the `REG/DIET` column of the source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DietFlag {
    Regular,
    Diet,
}

impl DietFlag {
    /// Parses the source spelling (`REG` / `DIET`, case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "REG" | "REGULAR" => Some(Self::Regular),
            "DIET" => Some(Self::Diet),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "REG",
            Self::Diet => "DIET",
        }
    }
}

impl fmt::Display for DietFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of fields an analysis may group by.
///
/// Configuration files name dimensions in snake case (`"pack_type"`); the
/// same spelling is used in report headers and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Region,
    Province,
    PrecisionArea,
    Manufacturer,
    Brand,
    FlavorSegment,
    Diet,
    PackType,
    PackSize,
    Sku,
}

impl Dimension {
    /// Every dimension, in canonical order.
    pub const ALL: [Dimension; 10] = [
        Dimension::Region,
        Dimension::Province,
        Dimension::PrecisionArea,
        Dimension::Manufacturer,
        Dimension::Brand,
        Dimension::FlavorSegment,
        Dimension::Diet,
        Dimension::PackType,
        Dimension::PackSize,
        Dimension::Sku,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::Province => "province",
            Self::PrecisionArea => "precision_area",
            Self::Manufacturer => "manufacturer",
            Self::Brand => "brand",
            Self::FlavorSegment => "flavor_segment",
            Self::Diet => "diet",
            Self::PackType => "pack_type",
            Self::PackSize => "pack_size",
            Self::Sku => "sku",
        }
    }

    /// Extracts this dimension's value from an observation.
    pub fn value_of<'a>(&self, obs: &'a SalesObservation) -> &'a str {
        match self {
            Self::Region => &obs.region,
            Self::Province => &obs.province,
            Self::PrecisionArea => &obs.precision_area,
            Self::Manufacturer => &obs.manufacturer,
            Self::Brand => &obs.brand,
            Self::FlavorSegment => &obs.flavor_segment,
            Self::Diet => obs.diet.as_str(),
            Self::PackType => &obs.pack_type,
            Self::PackSize => &obs.pack_size,
            Self::Sku => &obs.sku_id,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dimension::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| format!("unknown grouping dimension '{s}'"))
    }
}

/// The ordered values a group took along the configured grouping dimensions.
///
/// Keys compare lexicographically part by part, which is the tie-break and
/// output order used throughout the engine. Displayed and serialized joined
/// with `|`, the same spelling the exporter writes.
///
/// # Examples
///
/// ```
/// use cmi_rust::core::domain::DimensionKey;
///
/// let key = DimensionKey::new(vec!["Central".into(), "Cola".into()]);
/// assert_eq!(key.to_string(), "Central|Cola");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DimensionKey(Vec<String>);

impl DimensionKey {
    pub fn new(parts: Vec<String>) -> Self {
        Self(parts)
    }

    /// Builds the key for an observation along the given dimensions.
    pub fn from_observation(obs: &SalesObservation, dims: &[Dimension]) -> Self {
        Self(dims.iter().map(|d| d.value_of(obs).to_string()).collect())
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for DimensionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("|"))
    }
}

impl TryFrom<String> for DimensionKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err("dimension key must name at least one part".to_string());
        }
        Ok(Self(value.split('|').map(str::to_string).collect()))
    }
}

impl From<DimensionKey> for String {
    fn from(value: DimensionKey) -> Self {
        value.to_string()
    }
}

/// One narrow sales record: a single SKU in a single geography for a single
/// calendar month.
///
/// A value of `0.0` in `sales_amount` is a legitimate measurement (the SKU
/// was distributed but did not sell, or was absent) and is exactly what the
/// distribution-gap analysis counts. Negative amounts never enter the store;
/// ingestion rejects them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesObservation {
    pub region: String,
    pub province: String,
    pub precision_area: String,
    pub manufacturer: String,
    pub brand: String,
    pub flavor_segment: String,
    pub diet: DietFlag,
    pub pack_type: String,
    pub pack_size: String,
    pub sku_id: String,
    pub period: MonthKey,
    pub sales_amount: f64,
}

impl SalesObservation {
    /// Returns `true` when this observation recorded no sales.
    pub fn is_zero_sale(&self) -> bool {
        self.sales_amount == 0.0
    }
}

/// An observation paired with the 1-based row of the source table it came
/// from, kept until validation so ingest errors can point at the offender.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservation {
    pub source_row: usize,
    pub observation: SalesObservation,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(region: &str, sku: &str, month: u32, amount: f64) -> SalesObservation {
        SalesObservation {
            region: region.to_string(),
            province: "Riyadh".to_string(),
            precision_area: "Riyadh City".to_string(),
            manufacturer: "Aujan".to_string(),
            brand: "Rani".to_string(),
            flavor_segment: "Cola".to_string(),
            diet: DietFlag::Regular,
            pack_type: "CAN".to_string(),
            pack_size: "330ML".to_string(),
            sku_id: sku.to_string(),
            period: MonthKey::new(2024, month),
            sales_amount: amount,
        }
    }

    #[test]
    fn month_label_round_trips() {
        for (label, year, month) in [("Jan'24", 2024, 1), ("Jun'24", 2024, 6), ("Dec'24", 2024, 12)] {
            let key = MonthKey::parse_label(label).unwrap();
            assert_eq!(key, MonthKey::new(year, month));
            assert_eq!(key.label(), label);
        }
    }

    #[test]
    fn month_iso_round_trips() {
        let key: MonthKey = "2024-03".parse().unwrap();
        assert_eq!(key, MonthKey::new(2024, 3));
        assert_eq!(key.to_string(), "2024-03");
    }

    #[test]
    fn month_rejects_garbage() {
        assert!(MonthKey::parse_label("Region").is_none());
        assert!("not-a-month".parse::<MonthKey>().is_err());
    }

    #[test]
    fn month_order_is_chronological() {
        assert!(MonthKey::new(2023, 12) < MonthKey::new(2024, 1));
        assert!(MonthKey::new(2024, 1) < MonthKey::new(2024, 2));
    }

    #[test]
    #[should_panic(expected = "month must be 1..=12")]
    fn month_out_of_range_is_rejected() {
        let _ = MonthKey::new(2024, 13);
    }

    #[test]
    fn span_membership_and_iteration() {
        let window = MonthSpan::new(MonthKey::new(2023, 11), MonthKey::new(2024, 2));
        assert!(window.contains(MonthKey::new(2024, 1)));
        assert!(!window.contains(MonthKey::new(2024, 3)));

        let months = window.months();
        assert_eq!(months.len(), 4);
        assert_eq!(months[0], MonthKey::new(2023, 11));
        assert_eq!(months[3], MonthKey::new(2024, 2));
    }

    #[test]
    fn empty_span_yields_no_months() {
        let window = MonthSpan::new(MonthKey::new(2024, 6), MonthKey::new(2024, 1));
        assert!(window.is_empty());
        assert!(window.months().is_empty());
    }

    #[test]
    fn diet_flag_parses_source_spellings() {
        assert_eq!(DietFlag::parse("REG"), Some(DietFlag::Regular));
        assert_eq!(DietFlag::parse("diet"), Some(DietFlag::Diet));
        assert_eq!(DietFlag::parse("zero sugar"), None);
    }

    #[test]
    fn dimension_round_trips_through_names() {
        for dim in Dimension::ALL {
            assert_eq!(dim.as_str().parse::<Dimension>(), Ok(dim));
        }
        assert!("shelf".parse::<Dimension>().is_err());
    }

    #[test]
    fn dimension_key_follows_grouping_order() {
        let obs = observation("Central", "SKU-1", 1, 10.0);
        let key = DimensionKey::from_observation(&obs, &[Dimension::Region, Dimension::Diet]);
        assert_eq!(key.parts(), ["Central", "REG"]);
        assert_eq!(key.to_string(), "Central|REG");
    }

    #[test]
    fn dimension_keys_sort_part_by_part() {
        let a = DimensionKey::new(vec!["Central".into(), "CAN".into()]);
        let b = DimensionKey::new(vec!["Central".into(), "PET".into()]);
        let c = DimensionKey::new(vec!["Eastern".into(), "CAN".into()]);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn dimension_key_serializes_as_the_joined_string() {
        let key = DimensionKey::new(vec!["Eastern".into(), "Cola".into()]);
        let json = serde_json::to_value(&key).unwrap();
        assert!(json.is_string());
        assert_eq!(json, "Eastern|Cola");

        let back: DimensionKey = serde_json::from_value(json).unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<DimensionKey>("\"\"").is_err());
    }

    #[test]
    fn zero_sale_detection() {
        assert!(observation("Central", "SKU-1", 1, 0.0).is_zero_sale());
        assert!(!observation("Central", "SKU-1", 1, 0.01).is_zero_sale());
    }
}
