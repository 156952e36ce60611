use anyhow::{Context, Result};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;

use crate::core::domain::MonthKey;

/// Identifier column headers of the wide workbook format.
pub const REGION: &str = "Region";
pub const PROVINCE: &str = "Province";
pub const PRECISION_AREA: &str = "Precision Area";
// Double space as in the source workbook header.
pub const MANUFACTURER: &str = "KEY MANU  & KINZA";
pub const BRAND: &str = "BRAND";
pub const FLAVOR_SEGMENT: &str = "CSD Flavor Segment";
pub const DIET: &str = "REG/DIET";
pub const PACK_TYPE: &str = "PACK TYPE";
pub const PACK_SIZE: &str = "PACK SIZE";
pub const ITEM: &str = "ITEM";

/// All identifier columns, in workbook order.
pub const IDENTIFIER_COLUMNS: [&str; 10] = [
    REGION,
    PROVINCE,
    PRECISION_AREA,
    MANUFACTURER,
    BRAND,
    FLAVOR_SEGMENT,
    DIET,
    PACK_TYPE,
    PACK_SIZE,
    ITEM,
];

/// Detects month columns by their `MMM'yy` header, chronologically sorted.
pub fn month_columns(df: &DataFrame) -> Vec<(String, MonthKey)> {
    let mut columns: Vec<(String, MonthKey)> = df
        .get_column_names()
        .iter()
        .filter_map(|name| MonthKey::parse_label(name.as_str()).map(|key| (name.to_string(), key)))
        .collect();
    columns.sort_by_key(|(_, key)| *key);
    columns
}

/// Parse a wide CSV file into a Polars DataFrame
pub fn read_wide_csv(csv_path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(csv_path.into()))?
        .finish()
        .context("Failed to parse CSV into DataFrame")?;

    normalize_types(df)
}

/// Parse wide CSV text (in-memory sources and tests) into a DataFrame
pub fn read_wide_csv_str(data: &str) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(data.as_bytes()))
        .finish()
        .context("Failed to parse CSV text into DataFrame")?;

    normalize_types(df)
}

/// Cast columns to expected types if they were inferred incorrectly.
///
/// Identifier columns become String (SKU codes may be inferred as i64);
/// month columns become Float64 (integer cells are inferred as i64 when no
/// decimal point appears). Garbage in a month cell casts to null, which the
/// reshape step reports as a malformed row.
fn normalize_types(df: DataFrame) -> Result<DataFrame> {
    let column_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let months = month_columns(&df);

    let mut lazy_df = df.lazy();

    for col_name in IDENTIFIER_COLUMNS {
        if column_names.contains(&col_name.to_string()) {
            lazy_df = lazy_df.with_column(col(col_name).cast(DataType::String));
        }
    }

    for (col_name, _) in &months {
        lazy_df = lazy_df.with_column(
            when(col(col_name.as_str()).is_not_null())
                .then(col(col_name.as_str()).cast(DataType::Float64))
                .otherwise(lit(NULL).cast(DataType::Float64))
                .alias(col_name.as_str()),
        );
    }

    lazy_df
        .collect()
        .context("Failed to cast columns to expected types")
}
