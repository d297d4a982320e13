use async_trait::async_trait;

pub const UNKNOWN: &str = "Unknown";

/// Sector classification of a listed company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerProfile {
    pub sector: String,
    pub industry: String,
}

impl TickerProfile {
    pub fn unknown() -> Self {
        Self {
            sector: UNKNOWN.to_string(),
            industry: UNKNOWN.to_string(),
        }
    }
}

#[async_trait]
pub trait ProfileProvider: Send + Sync {
    async fn fetch_profile(&self, symbol: &str) -> anyhow::Result<TickerProfile>;
}
