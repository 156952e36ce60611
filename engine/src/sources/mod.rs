//! Input data sources.
//!
//! A [`DataSource`] hands the pipeline one wide-format table per run.
//! Sources are selected by configuration and injected where the pipeline is
//! assembled; the analytic services never know where the table came from.
//! Fetching is the only suspending boundary in the crate and it runs once,
//! eagerly, before any analysis.

pub mod csv_file;
#[cfg(feature = "local-source")]
pub mod memory;

pub use csv_file::CsvFileSource;
#[cfg(feature = "local-source")]
pub use memory::MemorySource;

use anyhow::Result;
use async_trait::async_trait;
use polars::prelude::DataFrame;

/// Supplier of one wide-format sales table.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so a source can be shared with the
/// async runtime.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch the wide table, with identifier columns as strings and month
    /// columns as floats.
    ///
    /// # Returns
    /// * `Ok(DataFrame)` - the normalized wide table
    /// * `Err` - if the underlying medium could not be read or parsed
    async fn fetch(&self) -> Result<DataFrame>;

    /// Short label for logs and error messages.
    fn name(&self) -> &str;
}
