//! Errors raised by the holdings analyzer.

/// Selection errors surfaced to the user when a fund or period cannot be analyzed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("unknown fund: {fund}")]
    UnknownFund { fund: String },

    #[error("insufficient history for fund {fund}: found {periods} period(s), need at least 2")]
    InsufficientHistory { fund: String, periods: usize },

    #[error("no holdings for fund {fund} in period {period}")]
    NoHoldings { fund: String, period: String },
}
