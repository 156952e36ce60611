//! In-memory source for tests and local development.

use anyhow::Result;
use async_trait::async_trait;
use polars::prelude::DataFrame;

use super::DataSource;
use crate::parsing::read_wide_csv_str;

/// Holds the wide table as CSV text; nothing touches the filesystem.
#[derive(Debug, Clone)]
pub struct MemorySource {
    rows: String,
}

impl MemorySource {
    pub fn new(rows: impl Into<String>) -> Self {
        Self { rows: rows.into() }
    }
}

#[async_trait]
impl DataSource for MemorySource {
    async fn fetch(&self) -> Result<DataFrame> {
        read_wide_csv_str(&self.rows)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_parses_inline_rows() {
        let source = MemorySource::new(
            "Region,Province,Precision Area,KEY MANU  & KINZA,BRAND,CSD Flavor Segment,REG/DIET,PACK TYPE,PACK SIZE,ITEM,Jan'24,Feb'24\n\
             Central,Riyadh,Riyadh City,PepsiCo,Pepsi,Cola,REG,Can,330ml,1001,120.5,0\n\
             East,Dammam,Dammam City,Coca-Cola,Coke,Cola,DIET,Bottle,500ml,2002,80,95.25\n",
        );

        let df = source.fetch().await.unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(source.name(), "memory");
    }
}
