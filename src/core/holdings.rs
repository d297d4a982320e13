//! Fund holdings dataset and its JSON loader.
use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Top-level key holding rows for every fund.
pub const ALL_FUNDS_KEY: &str = "TUM_FONLAR";

/// One ticker's weight in one fund for one reporting period.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HoldingRecord {
    #[serde(alias = "fon_adi")]
    pub fund_name: String,
    #[serde(default)]
    pub company_name: Option<String>,
    pub period: String,
    #[serde(alias = "hisse_kodu")]
    pub ticker: String,
    #[serde(alias = "yuzdelik_deger", default)]
    pub holding_percentage: Option<f64>,
    #[serde(alias = "rapor_index", default, deserialize_with = "report_index")]
    pub report_index: Option<String>,
    #[serde(alias = "alis_tarihi", default, deserialize_with = "lenient_date")]
    pub acquisition_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
}

fn report_index<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<Scalar>::deserialize(deserializer)?.map(|value| match value {
            Scalar::Text(s) => s,
            Scalar::Integer(i) => i.to_string(),
            // Indices stored as floats by upstream tooling, e.g. 1234567.0
            Scalar::Float(f) if f.fract() == 0.0 => format!("{f:.0}"),
            Scalar::Float(f) => f.to_string(),
        }),
    )
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<Scalar>::deserialize(deserializer)?.and_then(|value| match value {
            Scalar::Text(s) => parse_date(&s),
            // Epoch milliseconds, the default date encoding of dataframe JSON exports
            Scalar::Integer(ms) => DateTime::<Utc>::from_timestamp_millis(ms).map(|dt| dt.date_naive()),
            Scalar::Float(ms) if ms.is_finite() => {
                DateTime::<Utc>::from_timestamp_millis(ms as i64).map(|dt| dt.date_naive())
            }
            Scalar::Float(_) => None,
        }),
    )
}

/// Exchange-independent part of a ticker, e.g. `THYAO` for `THYAO.E`.
pub fn base_ticker(ticker: &str) -> &str {
    ticker.split('.').next().unwrap_or(ticker).trim()
}

/// Parses `YYYY-MM-DD`, ignoring any trailing time component.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let day = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HoldingsFrame {
    Records(Vec<HoldingRecord>),
    Columns(BTreeMap<String, Vec<serde_json::Value>>),
}

#[derive(Deserialize)]
struct HoldingsDocument {
    #[serde(rename = "TUM_FONLAR")]
    all_funds: HoldingsFrame,
}

/// The full holdings table, kept in input order.
#[derive(Debug, Clone, Default)]
pub struct HoldingsTable {
    records: Vec<HoldingRecord>,
}

impl HoldingsTable {
    pub fn new(records: Vec<HoldingRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[HoldingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn for_fund<'a>(&'a self, fund: &'a str) -> impl Iterator<Item = &'a HoldingRecord> {
        self.records.iter().filter(move |r| r.fund_name == fund)
    }

    pub fn contains_fund(&self, fund: &str) -> bool {
        self.records.iter().any(|r| r.fund_name == fund)
    }

    /// Unique tickers in order of first appearance.
    pub fn unique_tickers(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.records
            .iter()
            .map(|r| r.ticker.as_str())
            .filter(|t| seen.insert(*t))
            .collect()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: HoldingsDocument = serde_json::from_str(json)
            .with_context(|| format!("Holdings document must contain a `{ALL_FUNDS_KEY}` table"))?;

        let records = match doc.all_funds {
            HoldingsFrame::Records(records) => records,
            HoldingsFrame::Columns(columns) => records_from_columns(columns)?,
        };
        debug!(rows = records.len(), "Parsed holdings table");
        Ok(Self { records })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read holdings file: {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("Failed to parse holdings file: {}", path.display()))
    }
}

fn records_from_columns(columns: BTreeMap<String, Vec<serde_json::Value>>) -> Result<Vec<HoldingRecord>> {
    let rows = columns.values().map(Vec::len).max().unwrap_or(0);
    if let Some((name, col)) = columns.iter().find(|(_, c)| c.len() != rows) {
        bail!("Column `{name}` has {} values, expected {rows}", col.len());
    }

    (0..rows)
        .map(|i| {
            let row: serde_json::Map<String, serde_json::Value> = columns
                .iter()
                .map(|(name, col)| (name.clone(), col[i].clone()))
                .collect();
            serde_json::from_value(serde_json::Value::Object(row))
                .with_context(|| format!("Invalid holdings row {i}"))
        })
        .collect()
}
