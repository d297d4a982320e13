//! Configured input files with memoized loading.
use crate::core::cache::FileCache;
use crate::core::config::AppConfig;
use crate::core::holdings::HoldingsTable;
use crate::core::price::PriceTable;
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

pub struct Workspace {
    config: AppConfig,
    holdings: FileCache<HoldingsTable>,
    prices: FileCache<PriceTable>,
}

impl Workspace {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            holdings: FileCache::new(),
            prices: FileCache::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub async fn holdings(&self) -> Result<Arc<HoldingsTable>> {
        self.holdings
            .get_or_load(&self.config.holdings_path, |p| HoldingsTable::load(p))
            .await
    }

    /// The price table, or `None` when nothing has been fetched yet.
    pub async fn prices(&self) -> Result<Option<Arc<PriceTable>>> {
        let path = &self.config.prices_path;
        if !path.exists() {
            debug!("No price file at {}", path.display());
            return Ok(None);
        }
        self.prices
            .get_or_load(path, |p| PriceTable::read_csv(p))
            .await
            .map(Some)
    }

    /// Replaces the price file and drops any memoized copy of it.
    pub async fn store_prices(&self, table: &PriceTable) -> Result<()> {
        table.write_csv(&self.config.prices_path)?;
        self.prices.invalidate(&self.config.prices_path).await;
        Ok(())
    }
}
