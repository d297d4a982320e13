//! Builds the price table for every ticker in the holdings dataset.
use crate::core::holdings::{HoldingsTable, base_ticker};
use crate::core::metadata::{ProfileProvider, TickerProfile};
use crate::core::price::{DailyClose, PriceHistoryProvider, PriceRecord, PriceTable};
use anyhow::{Context, Result};
use chrono::{Datelike, Months, NaiveDate};
use tracing::{debug, info};

/// A holdings ticker paired with the symbol the provider knows it by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerSymbol {
    pub ticker: String,
    pub symbol: String,
}

pub fn ticker_symbol(ticker: &str, exchange_suffix: &str) -> TickerSymbol {
    let ticker = base_ticker(ticker);
    TickerSymbol {
        ticker: ticker.to_string(),
        symbol: format!("{ticker}{exchange_suffix}"),
    }
}

/// Provider symbols for every distinct ticker, in order of first appearance.
pub fn fetch_plan(holdings: &HoldingsTable, exchange_suffix: &str) -> Vec<TickerSymbol> {
    let mut plan: Vec<TickerSymbol> = Vec::new();
    for ticker in holdings.unique_tickers() {
        let entry = ticker_symbol(ticker, exchange_suffix);
        if !plan.contains(&entry) {
            plan.push(entry);
        }
    }
    plan
}

pub fn to_price_records(
    ticker: &TickerSymbol,
    closes: &[DailyClose],
    profile: &TickerProfile,
) -> Vec<PriceRecord> {
    closes
        .iter()
        .map(|c| PriceRecord {
            date: c.date,
            close: Some(c.close),
            ticker: ticker.ticker.clone(),
            sector: profile.sector.clone(),
            industry: profile.industry.clone(),
        })
        .collect()
}

/// First day of the month `months_back` months before `today`.
pub fn default_start_date(today: NaiveDate, months_back: u32) -> NaiveDate {
    let first = today.with_day(1).unwrap_or(today);
    first
        .checked_sub_months(Months::new(months_back))
        .unwrap_or(first)
}

/// Fetches history and profile for each ticker, one at a time. The first
/// failure aborts the run and nothing is returned.
pub async fn fetch_price_table<P>(
    plan: &[TickerSymbol],
    provider: &P,
    start: NaiveDate,
    update_callback: &(dyn Fn(&TickerSymbol)),
) -> Result<PriceTable>
where
    P: PriceHistoryProvider + ProfileProvider + ?Sized,
{
    info!(tickers = plan.len(), %start, "Fetching price history");
    let mut records = Vec::new();

    for ticker in plan {
        let closes = provider
            .fetch_daily_closes(&ticker.symbol, start)
            .await
            .with_context(|| format!("Failed to fetch prices for {}", ticker.ticker))?;
        let profile = provider
            .fetch_profile(&ticker.symbol)
            .await
            .with_context(|| format!("Failed to fetch profile for {}", ticker.ticker))?;

        debug!(ticker = %ticker.ticker, rows = closes.len(), sector = %profile.sector, "Fetched ticker");
        records.extend(to_price_records(ticker, &closes, &profile));
        update_callback(ticker);
    }

    Ok(PriceTable::new(records))
}
