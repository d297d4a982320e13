use crate::core::price::LatestPriceMode;
use crate::providers::yahoo_finance::DEFAULT_BASE_URL;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YahooProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub yahoo: Option<YahooProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            yahoo: Some(YahooProviderConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
            }),
        }
    }
}

impl ProvidersConfig {
    pub fn yahoo_base_url(&self) -> &str {
        self.yahoo.as_ref().map_or(DEFAULT_BASE_URL, |p| &p.base_url)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct FetchConfig {
    /// Appended to each base ticker to form the provider symbol.
    pub exchange_suffix: String,
    /// Overrides `lookback_months` when set.
    pub start_date: Option<NaiveDate>,
    pub lookback_months: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            exchange_suffix: ".IS".to_string(),
            start_date: None,
            lookback_months: 4,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    pub latest_price: LatestPriceMode,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_holdings_path")]
    pub holdings_path: PathBuf,
    #[serde(default = "default_prices_path")]
    pub prices_path: PathBuf,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

fn default_holdings_path() -> PathBuf {
    PathBuf::from("analysis_data.json")
}

fn default_prices_path() -> PathBuf {
    PathBuf::from("stock_close_data.csv")
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            holdings_path: default_holdings_path(),
            prices_path: default_prices_path(),
            providers: ProvidersConfig::default(),
            fetch: FetchConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the default config file, falling back to defaults when it does not exist.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "fonlens", "fonlens")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn fetch_start_date(&self, today: NaiveDate) -> NaiveDate {
        self.fetch.start_date.unwrap_or_else(|| {
            crate::core::fetch::default_start_date(today, self.fetch.lookback_months)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
holdings_path: "/data/analysis_data.json"
prices_path: "/data/prices.csv"
providers:
  yahoo:
    base_url: "http://example.com/yahoo"
fetch:
  exchange_suffix: ".IS"
  start_date: "2025-05-01"
analysis:
  latest_price: per_ticker
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.holdings_path, PathBuf::from("/data/analysis_data.json"));
        assert_eq!(config.prices_path, PathBuf::from("/data/prices.csv"));
        assert_eq!(config.providers.yahoo_base_url(), "http://example.com/yahoo");
        assert_eq!(config.fetch.exchange_suffix, ".IS");
        assert_eq!(config.fetch.lookback_months, 4);
        assert_eq!(config.analysis.latest_price, LatestPriceMode::PerTicker);

        let today = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        assert_eq!(
            config.fetch_start_date(today),
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.holdings_path, PathBuf::from("analysis_data.json"));
        assert_eq!(config.prices_path, PathBuf::from("stock_close_data.csv"));
        assert_eq!(
            config.providers.yahoo_base_url(),
            "https://query1.finance.yahoo.com"
        );
        assert_eq!(config.analysis.latest_price, LatestPriceMode::GlobalLatestDate);

        let today = NaiveDate::from_ymd_opt(2025, 9, 17).unwrap();
        assert_eq!(
            config.fetch_start_date(today),
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
        );
    }

    #[test]
    fn test_invalid_latest_price_mode_rejected() {
        let result: Result<AppConfig, _> =
            serde_yaml::from_str("analysis:\n  latest_price: newest\n");
        assert!(result.is_err());
    }
}
