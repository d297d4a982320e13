use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::core::metadata::{ProfileProvider, TickerProfile, UNKNOWN};
use crate::core::price::{DailyClose, PriceHistoryProvider};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

fn http_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().user_agent("fonlens/0.1").build()?)
}

fn extract_daily_closes(item: &PriceChartItem) -> Vec<DailyClose> {
    let (Some(timestamps), Some(closes)) = (
        item.timestamp.as_ref(),
        item.indicators
            .as_ref()
            .and_then(|inds| inds.quote.first())
            .and_then(|q| q.close.as_ref()),
    ) else {
        return Vec::new();
    };

    let offset = item.meta.gmtoffset.unwrap_or(0);
    timestamps
        .iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            let close = (*close)?;
            // Session timestamps are UTC; shift to exchange-local time before taking the date.
            let date = DateTime::<Utc>::from_timestamp(ts + offset, 0)?.date_naive();
            Some(DailyClose { date, close })
        })
        .collect()
}

pub struct YahooFinanceProvider {
    base_url: String,
}

impl YahooFinanceProvider {
    pub fn new(base_url: &str) -> Self {
        YahooFinanceProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct YahooPriceResponse {
    chart: PriceChartResult,
}

#[derive(Deserialize, Debug)]
struct PriceChartResult {
    result: Option<Vec<PriceChartItem>>,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Deserialize, Debug)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

#[derive(Deserialize, Debug)]
struct PriceChartItem {
    meta: PriceChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Deserialize, Debug)]
struct PriceChartMeta {
    #[serde(default)]
    gmtoffset: Option<i64>,
}

#[async_trait]
impl PriceHistoryProvider for YahooFinanceProvider {
    #[instrument(name = "YahooHistoryFetch", skip(self), fields(symbol = %symbol))]
    async fn fetch_daily_closes(&self, symbol: &str, start: NaiveDate) -> Result<Vec<DailyClose>> {
        let period1 = start
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or_default();
        let period2 = Utc::now().timestamp();
        let url = format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d",
            self.base_url, symbol, period1, period2
        );
        debug!("Requesting price history from {}", url);

        let response = http_client()?
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {} URL: {}", e, symbol, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for symbol: {}",
                response.status(),
                symbol
            ));
        }

        let text = response.text().await?;
        let data: YahooPriceResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", symbol, e))?;

        let item = data
            .chart
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No price data found for symbol: {}", symbol))?;

        let closes = extract_daily_closes(&item);
        debug!(rows = closes.len(), "Parsed price history");
        Ok(closes)
    }
}

#[derive(Deserialize, Debug)]
struct YahooSummaryResponse {
    #[serde(alias = "quoteSummary")]
    quote_summary: QuoteSummary,
}

#[derive(Deserialize, Debug)]
struct QuoteSummary {
    result: Option<Vec<QuoteSummaryItem>>,
}

#[derive(Deserialize, Debug)]
struct QuoteSummaryItem {
    #[serde(alias = "assetProfile")]
    asset_profile: Option<AssetProfile>,
}

#[derive(Deserialize, Debug)]
struct AssetProfile {
    sector: Option<String>,
    industry: Option<String>,
}

#[async_trait]
impl ProfileProvider for YahooFinanceProvider {
    #[instrument(name = "YahooProfileFetch", skip(self), fields(symbol = %symbol))]
    async fn fetch_profile(&self, symbol: &str) -> Result<TickerProfile> {
        let url = format!(
            "{}/v10/finance/quoteSummary/{}?modules=assetProfile",
            self.base_url, symbol
        );
        debug!("Requesting asset profile from {}", url);

        let response = http_client()?
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {} URL: {}", e, symbol, url))?;

        // Yahoo answers 404 for listings it has no profile for.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            warn!(status = %response.status(), "No asset profile, using defaults");
            return Ok(TickerProfile::unknown());
        }
        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for symbol: {}",
                response.status(),
                symbol
            ));
        }

        let text = response.text().await?;
        let data: YahooSummaryResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", symbol, e))?;

        let profile = data
            .quote_summary
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|item| item.asset_profile);

        match profile {
            Some(AssetProfile {
                sector: Some(sector),
                industry,
            }) => Ok(TickerProfile {
                sector,
                industry: industry.unwrap_or_else(|| UNKNOWN.to_string()),
            }),
            _ => {
                warn!("Asset profile has no sector, using defaults");
                Ok(TickerProfile::unknown())
            }
        }
    }
}
