//! # CMI Analytics Engine
//!
//! Distribution-gap and seasonality analytics for carbonated soft drink
//! sales across Saudi Arabia.
//!
//! This crate ingests per-SKU, per-region, per-month sales tables in the
//! established wide workbook format, validates them into an immutable batch
//! of narrow observations, and computes the metrics a market-entry report is
//! built from: zero-sales gap rates, seasonal variation, diet penetration,
//! and a composite opportunity ranking, exported as a stable delimited table.
//!
//! ## Features
//!
//! - **Ingestion**: parse the wide monthly workbook CSV and reshape it into
//!   narrow observations, rejecting malformed batches whole
//! - **Gap Analysis**: zero-sales rates per dimension group with a minimum
//!   sample floor
//! - **Seasonality**: coefficient of variation and peak/trough months per
//!   group
//! - **Opportunity Ranking**: weighted composite of gap, seasonality and
//!   (inverted) diet penetration, ranked as a total order
//! - **Reporting**: byte-stable delimited export with a SHA-256 run checksum
//!
//! ## Architecture
//!
//! - [`core`]: domain types shared by every layer
//! - [`parsing`]: wide CSV reading and the wide/narrow reshape
//! - [`store`]: the validated in-memory record store
//! - [`services`]: pure analytic computations
//! - [`sources`]: pluggable input suppliers
//! - [`report`]: serialization of ranked results
//! - [`pipeline`]: whole-run orchestration
//! - [`config`] and [`error`]: run configuration and the error taxonomy

pub mod config;
pub mod core;
pub mod error;
pub mod parsing;
pub mod pipeline;
pub mod report;
pub mod services;
pub mod sources;
pub mod store;
