//! Parsers for wide-format sales workbooks.
//!
//! Source data arrives "wide": one row per SKU and geography, identifier
//! columns on the left, one numeric column per calendar month on the right.
//! This module reads that shape and reshapes it into the narrow observations
//! the rest of the engine consumes.
//!
//! - [`wide_csv`]: Read wide CSV tables into typed DataFrames
//! - [`reshape`]: Melt wide tables into observations and pivot them back
//!
//! # Example
//!
//! ```no_run
//! use cmi_rust::parsing::{read_wide_csv, reshape};
//! use std::path::Path;
//!
//! let df = read_wide_csv(Path::new("sales_2024.csv")).expect("readable workbook");
//! let rows = reshape::wide_to_observations(&df).expect("well-formed workbook");
//! ```

pub mod reshape;
pub mod wide_csv;


pub use reshape::{observations_to_wide, wide_to_observations};
pub use wide_csv::{read_wide_csv, read_wide_csv_str};
