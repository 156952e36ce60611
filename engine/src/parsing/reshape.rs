//! Wide/narrow reshaping of sales tables.
//!
//! The melt direction ([`wide_to_observations`]) is the validating boundary
//! for table shape: absent columns, empty identifier fields and non-numeric
//! month cells are fatal here. Domain rules (negative amounts, window
//! membership, duplicate keys) are checked later by the record store, which
//! is why the melt emits [`RawObservation`]s that still carry their source
//! row. Columns outside the modeled identifier set are ignored, so the
//! pivot direction restores exactly the modeled table.

use anyhow::Result;
use polars::prelude::*;
use std::collections::HashMap;

use crate::core::domain::{DietFlag, MonthKey, RawObservation, SalesObservation};
use crate::error::IngestError;
use crate::parsing::wide_csv::{self, IDENTIFIER_COLUMNS};

fn str_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked, IngestError> {
    let column = df.column(name).map_err(|_| IngestError::MissingColumn {
        column: name.to_string(),
    })?;
    column.str().map_err(|_| IngestError::MistypedColumn {
        column: name.to_string(),
        expected: "text".to_string(),
        found: column.dtype().to_string(),
    })
}

fn f64_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Float64Chunked, IngestError> {
    let column = df.column(name).map_err(|_| IngestError::MissingColumn {
        column: name.to_string(),
    })?;
    column.f64().map_err(|_| IngestError::MistypedColumn {
        column: name.to_string(),
        expected: "numeric".to_string(),
        found: column.dtype().to_string(),
    })
}

fn required_field(
    cells: &StringChunked,
    row_idx: usize,
    field: &str,
) -> Result<String, IngestError> {
    match cells.get(row_idx) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(IngestError::malformed(row_idx + 1, field)),
    }
}

/// Melts a wide sales table into narrow observations.
///
/// Each (row, month column) cell becomes one observation carrying the full
/// dimension tuple. Output order is row-major with months chronological, so
/// the melt is deterministic. Rows are numbered from 1, header excluded.
pub fn wide_to_observations(df: &DataFrame) -> Result<Vec<RawObservation>, IngestError> {
    let months = wide_csv::month_columns(df);
    if months.is_empty() {
        return Err(IngestError::MissingColumn {
            column: "MMM'yy month columns".to_string(),
        });
    }

    let regions = str_column(df, wide_csv::REGION)?;
    let provinces = str_column(df, wide_csv::PROVINCE)?;
    let precision_areas = str_column(df, wide_csv::PRECISION_AREA)?;
    let manufacturers = str_column(df, wide_csv::MANUFACTURER)?;
    let brands = str_column(df, wide_csv::BRAND)?;
    let flavor_segments = str_column(df, wide_csv::FLAVOR_SEGMENT)?;
    let diets = str_column(df, wide_csv::DIET)?;
    let pack_types = str_column(df, wide_csv::PACK_TYPE)?;
    let pack_sizes = str_column(df, wide_csv::PACK_SIZE)?;
    let items = str_column(df, wide_csv::ITEM)?;

    let month_cells: Vec<(&str, MonthKey, &Float64Chunked)> = months
        .iter()
        .map(|(name, key)| f64_column(df, name).map(|cells| (name.as_str(), *key, cells)))
        .collect::<Result<_, _>>()?;

    let mut observations = Vec::with_capacity(df.height() * months.len());

    for i in 0..df.height() {
        let source_row = i + 1;

        let region = required_field(regions, i, wide_csv::REGION)?;
        let province = required_field(provinces, i, wide_csv::PROVINCE)?;
        let precision_area = required_field(precision_areas, i, wide_csv::PRECISION_AREA)?;
        let manufacturer = required_field(manufacturers, i, wide_csv::MANUFACTURER)?;
        let brand = required_field(brands, i, wide_csv::BRAND)?;
        let flavor_segment = required_field(flavor_segments, i, wide_csv::FLAVOR_SEGMENT)?;
        let pack_type = required_field(pack_types, i, wide_csv::PACK_TYPE)?;
        let pack_size = required_field(pack_sizes, i, wide_csv::PACK_SIZE)?;
        let sku_id = required_field(items, i, wide_csv::ITEM)?;

        let diet_raw = required_field(diets, i, wide_csv::DIET)?;
        let diet = DietFlag::parse(&diet_raw)
            .ok_or_else(|| IngestError::malformed(source_row, wide_csv::DIET))?;

        for (name, period, cells) in &month_cells {
            let sales_amount = match cells.get(i) {
                Some(v) if v.is_finite() => v,
                _ => return Err(IngestError::malformed(source_row, *name)),
            };

            observations.push(RawObservation {
                source_row,
                observation: SalesObservation {
                    region: region.clone(),
                    province: province.clone(),
                    precision_area: precision_area.clone(),
                    manufacturer: manufacturer.clone(),
                    brand: brand.clone(),
                    flavor_segment: flavor_segment.clone(),
                    diet,
                    pack_type: pack_type.clone(),
                    pack_size: pack_size.clone(),
                    sku_id: sku_id.clone(),
                    period: *period,
                    sales_amount,
                },
            });
        }
    }

    Ok(observations)
}

/// Pivots narrow observations back into the wide workbook shape.
///
/// Rows keep first-appearance order of their identifier tuple; month columns
/// are chronological and labeled `MMM'yy`. A (row, month) pair with no
/// observation becomes a null cell.
pub fn observations_to_wide(observations: &[SalesObservation]) -> Result<DataFrame> {
    let mut months: Vec<MonthKey> = observations.iter().map(|o| o.period).collect();
    months.sort();
    months.dedup();

    // Identifier tuple -> row index, first appearance wins.
    let mut row_of: HashMap<Vec<String>, usize> = HashMap::new();
    let mut identifier_rows: Vec<Vec<String>> = Vec::new();

    for obs in observations {
        let tuple = identifier_tuple(obs);
        if !row_of.contains_key(&tuple) {
            row_of.insert(tuple.clone(), identifier_rows.len());
            identifier_rows.push(tuple);
        }
    }

    let month_index: HashMap<MonthKey, usize> =
        months.iter().enumerate().map(|(i, m)| (*m, i)).collect();
    let mut cells: Vec<Vec<Option<f64>>> = vec![vec![None; identifier_rows.len()]; months.len()];

    for obs in observations {
        let row = row_of[&identifier_tuple(obs)];
        let col = month_index[&obs.period];
        cells[col][row] = Some(obs.sales_amount);
    }

    let mut columns: Vec<Column> = IDENTIFIER_COLUMNS
        .iter()
        .enumerate()
        .map(|(field_idx, name)| {
            let values: Vec<String> = identifier_rows
                .iter()
                .map(|tuple| tuple[field_idx].clone())
                .collect();
            Column::new((*name).into(), values)
        })
        .collect();

    for (month, values) in months.iter().zip(cells) {
        columns.push(Column::new(month.label().as_str().into(), values));
    }

    Ok(DataFrame::new(columns)?)
}

fn identifier_tuple(obs: &SalesObservation) -> Vec<String> {
    vec![
        obs.region.clone(),
        obs.province.clone(),
        obs.precision_area.clone(),
        obs.manufacturer.clone(),
        obs.brand.clone(),
        obs.flavor_segment.clone(),
        obs.diet.as_str().to_string(),
        obs.pack_type.clone(),
        obs.pack_size.clone(),
        obs.sku_id.clone(),
    ]
}
