//! Wide CSV file source.

use anyhow::{Context, Result};
use async_trait::async_trait;
use polars::prelude::DataFrame;
use std::path::PathBuf;

use super::DataSource;
use crate::parsing::read_wide_csv;

/// Reads the wide sales table from a CSV file on disk.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl DataSource for CsvFileSource {
    async fn fetch(&self) -> Result<DataFrame> {
        let path = self.path.clone();
        // CSV decode is CPU-bound; keep it off the async worker threads.
        tokio::task::spawn_blocking(move || read_wide_csv(&path))
            .await
            .context("CSV read task failed")?
    }

    fn name(&self) -> &str {
        "csv-file"
    }
}
