//! Daily close prices: provider abstraction and the on-disk price table.

use crate::core::holdings::parse_date;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// One daily close as returned by a market-data provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: f64,
}

#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Daily closes for `symbol` from `start` up to the latest available session.
    async fn fetch_daily_closes(&self, symbol: &str, start: NaiveDate) -> Result<Vec<DailyClose>>;
}

/// One row of the price file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    #[serde(
        rename = "Date",
        serialize_with = "write_date",
        deserialize_with = "read_date"
    )]
    pub date: NaiveDate,
    #[serde(rename = "Close")]
    pub close: Option<f64>,
    #[serde(rename = "hisse_kodu")]
    pub ticker: String,
    pub sector: String,
    pub industry: String,
}

fn write_date<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
}

fn read_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
}

/// How the "latest price" of a ticker is picked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatestPriceMode {
    /// Use the most recent date across the whole table; tickers without a row
    /// on that date have no latest price.
    #[default]
    GlobalLatestDate,
    /// Use each ticker's own most recent row.
    PerTicker,
}

/// The full price table as written by the fetcher.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    records: Vec<PriceRecord>,
    by_key: HashMap<(String, NaiveDate), usize>,
}

impl PriceTable {
    pub fn new(records: Vec<PriceRecord>) -> Self {
        let by_key = records
            .iter()
            .enumerate()
            .map(|(i, r)| ((r.ticker.clone(), r.date), i))
            .collect();
        Self { records, by_key }
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.records.iter().map(|r| r.date).max()
    }

    pub fn row_on(&self, ticker: &str, date: NaiveDate) -> Option<&PriceRecord> {
        self.by_key
            .get(&(ticker.to_string(), date))
            .map(|&i| &self.records[i])
    }

    /// Latest row for `ticker` according to `mode`.
    pub fn latest_row(&self, ticker: &str, mode: LatestPriceMode) -> Option<&PriceRecord> {
        match mode {
            LatestPriceMode::GlobalLatestDate => {
                self.latest_date().and_then(|date| self.row_on(ticker, date))
            }
            LatestPriceMode::PerTicker => self
                .records
                .iter()
                .filter(|r| r.ticker == ticker)
                .max_by_key(|r| r.date),
        }
    }

    /// Any row for `ticker`; used for sector and industry, which are constant per ticker.
    pub fn any_row(&self, ticker: &str) -> Option<&PriceRecord> {
        self.records.iter().find(|r| r.ticker == ticker)
    }

    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to open price file: {}", path.display()))?;
        let records = reader
            .deserialize()
            .enumerate()
            .map(|(i, row)| {
                row.with_context(|| format!("Invalid row {} in {}", i + 1, path.display()))
            })
            .collect::<Result<Vec<PriceRecord>>>()?;
        debug!(rows = records.len(), path = %path.display(), "Loaded price table");
        Ok(Self::new(records))
    }

    /// Replaces the file at `path` wholesale. Rows go to a sibling temp file
    /// first so a failed write leaves the previous file untouched.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = std::path::PathBuf::from(tmp_name);

        {
            let mut writer = csv::Writer::from_path(&tmp_path)
                .with_context(|| format!("Failed to create {}", tmp_path.display()))?;
            if self.records.is_empty() {
                writer.write_record(["Date", "Close", "hisse_kodu", "sector", "industry"])?;
            }
            for record in &self.records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }

        fs::rename(&tmp_path, path)
            .with_context(|| format!("Failed to replace price file: {}", path.display()))?;
        debug!(rows = self.records.len(), path = %path.display(), "Wrote price table");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::tempdir;

    pub(crate) fn price(ticker: &str, date: &str, close: Option<f64>) -> PriceRecord {
        PriceRecord {
            date: parse_date(date).unwrap(),
            close,
            ticker: ticker.to_string(),
            sector: "Industrials".to_string(),
            industry: "Airlines".to_string(),
        }
    }

    #[test]
    fn test_written_file_has_expected_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prices.csv");
        let table = PriceTable::new(vec![price("THYAO", "2025-05-02", Some(301.5))]);

        table.write_csv(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("Date,Close,hisse_kodu,sector,industry"));
        assert_eq!(lines.next(), Some("2025-05-02,301.5,THYAO,Industrials,Airlines"));
        assert!(!dir.path().join("prices.csv.tmp").exists());
    }

    #[test]
    fn test_read_tolerates_timestamps_and_empty_close() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prices.csv");
        fs::write(
            &path,
            "Date,Close,hisse_kodu,sector,industry\n\
             2025-05-02 00:00:00,10.5,AKBNK,Financial Services,Banks\n\
             2025-05-05,,AKBNK,Financial Services,Banks\n",
        )
        .unwrap();

        let table = PriceTable::read_csv(&path).unwrap();
        assert_eq!(table.records().len(), 2);
        assert_eq!(table.records()[0].close, Some(10.5));
        assert_eq!(table.records()[1].close, None);
        assert_eq!(table.latest_date(), parse_date("2025-05-05"));
    }

    #[test]
    fn test_read_missing_file_fails() {
        let dir = tempdir().unwrap();
        let err = PriceTable::read_csv(dir.path().join("missing.csv")).unwrap_err();
        assert!(err.to_string().contains("Failed to open price file"));
    }

    #[test]
    fn test_latest_row_modes() {
        let table = PriceTable::new(vec![
            price("A", "2025-05-01", Some(1.0)),
            price("A", "2025-05-02", Some(2.0)),
            price("B", "2025-05-01", Some(5.0)),
        ]);

        let global = LatestPriceMode::GlobalLatestDate;
        assert_eq!(table.latest_row("A", global).and_then(|r| r.close), Some(2.0));
        assert!(table.latest_row("B", global).is_none());

        let per_ticker = LatestPriceMode::PerTicker;
        assert_eq!(table.latest_row("B", per_ticker).and_then(|r| r.close), Some(5.0));
        assert!(table.latest_row("C", per_ticker).is_none());
    }
}
