//! Holdings comparisons and aggregate views over the holdings and price tables.
use crate::core::error::AnalysisError;
use crate::core::holdings::{HoldingRecord, HoldingsTable, base_ticker};
use crate::core::price::{LatestPriceMode, PriceTable};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// Public disclosure page for a fund report.
pub const DISCLOSURE_BASE_URL: &str = "https://www.kap.org.tr/tr/Bildirim";

/// The two most recent reporting periods of a fund.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodPair {
    pub previous: String,
    pub current: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldingStatus {
    Kept,
    Added,
    Removed,
}

/// One ticker of the previous-vs-current comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingDiff {
    pub ticker: String,
    pub status: HoldingStatus,
    pub previous_percentage: Option<f64>,
    pub current_percentage: Option<f64>,
    pub acquisition_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct HoldingsDiff {
    pub fund: String,
    pub periods: PeriodPair,
    pub rows: Vec<HoldingDiff>,
}

/// An added or removed holding joined with its prices.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingChange {
    pub ticker: String,
    pub status: HoldingStatus,
    pub previous_percentage: Option<f64>,
    pub current_percentage: Option<f64>,
    pub acquisition_date: Option<NaiveDate>,
    pub acquisition_price: Option<f64>,
    pub latest_price: Option<f64>,
    pub latest_date: Option<NaiveDate>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub percentage_change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerCount {
    pub ticker: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'a> {
    AllFunds,
    Fund(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionRow {
    pub ticker: String,
    pub counts: Vec<usize>,
}

/// Ticker x period matrix of holding counts. Absent pairs are zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionMatrix {
    pub periods: Vec<String>,
    pub rows: Vec<DistributionRow>,
}

impl DistributionMatrix {
    pub fn total(&self) -> usize {
        self.rows.iter().flat_map(|r| r.counts.iter()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundSummary {
    pub fund: String,
    pub company_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HoldingsSnapshot<'a> {
    pub fund: String,
    pub period: String,
    pub company_name: Option<String>,
    pub disclosure_url: Option<String>,
    pub rows: Vec<&'a HoldingRecord>,
}

/// `((to - from) / from) * 100`, or `None` when either side is missing,
/// `from` is zero, or the result is not finite.
pub fn percentage_change(from: Option<f64>, to: Option<f64>) -> Option<f64> {
    let (from, to) = (from?, to?);
    if from == 0.0 {
        return None;
    }
    let change = ((to - from) / from) * 100.0;
    change.is_finite().then_some(change)
}

/// Distinct funds sorted by name, each with the company name of its first row.
pub fn fund_directory(table: &HoldingsTable) -> Vec<FundSummary> {
    let mut funds: BTreeMap<&str, Option<String>> = BTreeMap::new();
    for record in table.records() {
        funds
            .entry(record.fund_name.as_str())
            .or_insert_with(|| record.company_name.clone());
    }
    funds
        .into_iter()
        .map(|(fund, company_name)| FundSummary {
            fund: fund.to_string(),
            company_name,
        })
        .collect()
}

/// Distinct periods of `fund`, most recent first.
pub fn fund_periods(table: &HoldingsTable, fund: &str) -> Vec<String> {
    let periods: BTreeSet<&str> = table.for_fund(fund).map(|r| r.period.as_str()).collect();
    periods.into_iter().rev().map(str::to_string).collect()
}

pub fn latest_periods(table: &HoldingsTable, fund: &str) -> Result<PeriodPair, AnalysisError> {
    if !table.contains_fund(fund) {
        return Err(AnalysisError::UnknownFund {
            fund: fund.to_string(),
        });
    }
    match fund_periods(table, fund).as_slice() {
        [current, previous, ..] => Ok(PeriodPair {
            previous: previous.clone(),
            current: current.clone(),
        }),
        periods => Err(AnalysisError::InsufficientHistory {
            fund: fund.to_string(),
            periods: periods.len(),
        }),
    }
}

/// Weighted holdings of `fund` in `period`, keyed by ticker. Rows without a
/// weight carry no position and are left out.
fn weighted_holdings<'a>(
    table: &'a HoldingsTable,
    fund: &'a str,
    period: &'a str,
) -> BTreeMap<&'a str, (f64, &'a HoldingRecord)> {
    table
        .for_fund(fund)
        .filter(|r| r.period == period)
        .filter_map(|r| Some((r.ticker.as_str(), (r.holding_percentage?, r))))
        .collect()
}

/// Full outer join on ticker between the fund's previous and current period.
pub fn diff_holdings(table: &HoldingsTable, fund: &str) -> Result<HoldingsDiff, AnalysisError> {
    let periods = latest_periods(table, fund)?;

    let previous = weighted_holdings(table, fund, &periods.previous);
    let current = weighted_holdings(table, fund, &periods.current);

    let tickers: BTreeSet<&str> = previous.keys().chain(current.keys()).copied().collect();
    let rows = tickers
        .into_iter()
        .filter_map(|ticker| {
            let prev = previous.get(ticker);
            let cur = current.get(ticker);
            let status = match (prev, cur) {
                (Some(_), Some(_)) => HoldingStatus::Kept,
                (None, Some(_)) => HoldingStatus::Added,
                (Some(_), None) => HoldingStatus::Removed,
                (None, None) => return None,
            };
            Some(HoldingDiff {
                ticker: ticker.to_string(),
                status,
                previous_percentage: prev.map(|(pct, _)| *pct),
                current_percentage: cur.map(|(pct, _)| *pct),
                acquisition_date: cur.and_then(|(_, r)| r.acquisition_date),
            })
        })
        .collect::<Vec<_>>();

    debug!(
        fund,
        previous = %periods.previous,
        current = %periods.current,
        rows = rows.len(),
        "Computed holdings diff"
    );

    Ok(HoldingsDiff {
        fund: fund.to_string(),
        periods,
        rows,
    })
}

/// Joins added and removed holdings with their acquisition-date and latest closes.
pub fn enrich_changes(
    diff: &HoldingsDiff,
    prices: &PriceTable,
    mode: LatestPriceMode,
) -> Vec<HoldingChange> {
    diff.rows
        .iter()
        .filter(|row| row.status != HoldingStatus::Kept)
        .map(|row| {
            let key = base_ticker(&row.ticker);
            let acquisition_price = row
                .acquisition_date
                .and_then(|date| prices.row_on(key, date))
                .and_then(|r| r.close);
            let latest = prices.latest_row(key, mode);
            let latest_price = latest.and_then(|r| r.close);
            let profile = prices.any_row(key);

            HoldingChange {
                ticker: row.ticker.clone(),
                status: row.status,
                previous_percentage: row.previous_percentage,
                current_percentage: row.current_percentage,
                acquisition_date: row.acquisition_date,
                acquisition_price,
                latest_price,
                latest_date: latest.map(|r| r.date),
                sector: profile.map(|r| r.sector.clone()),
                industry: profile.map(|r| r.industry.clone()),
                percentage_change: percentage_change(acquisition_price, latest_price),
            }
        })
        .collect()
}

fn count_tickers<'a>(rows: impl IntoIterator<Item = &'a HoldingRecord>) -> Vec<TickerCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in rows {
        *counts.entry(record.ticker.as_str()).or_insert(0) += 1;
    }
    let mut counts: Vec<TickerCount> = counts
        .into_iter()
        .map(|(ticker, count)| TickerCount {
            ticker: ticker.to_string(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.ticker.cmp(&b.ticker)));
    counts
}

/// How often each ticker appears across every fund and period.
pub fn most_chosen(table: &HoldingsTable) -> Vec<TickerCount> {
    count_tickers(table.records())
}

/// How often each ticker appears across every fund in `period`.
pub fn most_chosen_in_period(table: &HoldingsTable, period: &str) -> Vec<TickerCount> {
    count_tickers(table.records().iter().filter(|r| r.period == period))
}

pub fn period_distribution(table: &HoldingsTable, scope: Scope<'_>) -> DistributionMatrix {
    let rows: Vec<&HoldingRecord> = match scope {
        Scope::AllFunds => table.records().iter().collect(),
        Scope::Fund(fund) => table.for_fund(fund).collect(),
    };

    let periods: Vec<String> = rows
        .iter()
        .map(|r| r.period.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();
    let column: HashMap<&str, usize> = periods
        .iter()
        .enumerate()
        .map(|(i, p)| (p.as_str(), i))
        .collect();

    let mut matrix: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for record in &rows {
        let counts = matrix
            .entry(record.ticker.as_str())
            .or_insert_with(|| vec![0; periods.len()]);
        counts[column[record.period.as_str()]] += 1;
    }

    DistributionMatrix {
        rows: matrix
            .into_iter()
            .map(|(ticker, counts)| DistributionRow {
                ticker: ticker.to_string(),
                counts,
            })
            .collect(),
        periods,
    }
}

pub fn disclosure_url(report_index: &str) -> String {
    format!("{DISCLOSURE_BASE_URL}/{report_index}")
}

/// Rows of `fund` in `period`, with the fund's company name and report link.
pub fn holdings_snapshot<'a>(
    table: &'a HoldingsTable,
    fund: &str,
    period: &str,
) -> Result<HoldingsSnapshot<'a>, AnalysisError> {
    let rows: Vec<&HoldingRecord> = table
        .records()
        .iter()
        .filter(|r| r.fund_name == fund && r.period == period)
        .collect();

    let first = rows.first().ok_or_else(|| AnalysisError::NoHoldings {
        fund: fund.to_string(),
        period: period.to_string(),
    })?;

    Ok(HoldingsSnapshot {
        fund: fund.to_string(),
        period: period.to_string(),
        company_name: first.company_name.clone(),
        disclosure_url: first.report_index.as_deref().map(disclosure_url),
        rows,
    })
}
