pub mod changes;
pub mod dashboard;
pub mod distribution;
pub mod export;
pub mod fetch;
pub mod funds;
pub mod holdings;
pub mod popular;
pub mod setup;
pub mod ui;

use crate::core::analytics::{fund_directory, fund_periods};
use crate::core::{AnalysisError, HoldingsTable};

/// Resolves the fund and period to display, defaulting to the first fund by
/// name and that fund's most recent period.
pub(crate) fn select_fund_period(
    table: &HoldingsTable,
    fund: Option<&str>,
    period: Option<&str>,
) -> Result<(String, String), AnalysisError> {
    let fund = match fund {
        Some(fund) => fund.to_string(),
        None => fund_directory(table)
            .into_iter()
            .next()
            .map(|f| f.fund)
            .ok_or_else(|| AnalysisError::UnknownFund {
                fund: String::new(),
            })?,
    };

    let periods = fund_periods(table, &fund);
    let Some(latest) = periods.first() else {
        return Err(AnalysisError::UnknownFund { fund });
    };

    let period = match period {
        Some(p) if periods.iter().any(|known| known == p) => p.to_string(),
        Some(p) => {
            return Err(AnalysisError::NoHoldings {
                fund,
                period: p.to_string(),
            });
        }
        None => latest.clone(),
    };
    Ok((fund, period))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::holdings::tests::holding;

    fn table() -> HoldingsTable {
        HoldingsTable::new(vec![
            holding("ZFN", "2024-01", "A", 1.0),
            holding("AFN", "2024-01", "A", 1.0),
            holding("AFN", "2024-03", "B", 1.0),
        ])
    }

    #[test]
    fn test_defaults_to_first_fund_and_latest_period() {
        assert_eq!(
            select_fund_period(&table(), None, None).unwrap(),
            ("AFN".to_string(), "2024-03".to_string())
        );
    }

    #[test]
    fn test_explicit_selection_is_validated() {
        assert_eq!(
            select_fund_period(&table(), Some("ZFN"), Some("2024-01")).unwrap(),
            ("ZFN".to_string(), "2024-01".to_string())
        );
        assert!(matches!(
            select_fund_period(&table(), Some("ZFN"), Some("2024-03")),
            Err(AnalysisError::NoHoldings { .. })
        ));
        assert!(matches!(
            select_fund_period(&table(), Some("NOPE"), None),
            Err(AnalysisError::UnknownFund { .. })
        ));
    }
}
