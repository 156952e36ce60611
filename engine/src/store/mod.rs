//! Validated in-memory storage for sales observations.
//!
//! A [`RecordSet`] is the engine's unit of analysis: a batch of observations
//! that passed every ingest rule, frozen for the duration of a run. Analyzers
//! share it read-only; nothing downstream of [`RecordSet::load`] mutates it.
//!
//! - [`records::RecordSet`]: the validated, immutable batch
//! - [`records::RecordView`]: a borrowed, filtered view of a batch

pub mod records;

#[cfg(test)]
mod records_tests;

pub use records::{group_observations, RecordSet, RecordView};
