//! Core business logic abstractions

pub mod analytics;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod holdings;
pub mod log;
pub mod metadata;
pub mod price;
pub mod workspace;

// Re-export main types for cleaner imports
pub use error::AnalysisError;
pub use holdings::{HoldingRecord, HoldingsTable};
pub use metadata::{ProfileProvider, TickerProfile};
pub use price::{LatestPriceMode, PriceHistoryProvider, PriceRecord, PriceTable};
pub use workspace::Workspace;
