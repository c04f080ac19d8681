//! Configuration
//!
//! Environment-driven settings for the data layer and the engine. Parsing
//! goes through a lookup function so it can be exercised without touching
//! the process environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::analyst::{Analyst, DEFAULT_WINDOW_DAYS};
use crate::engine::RecommendationEngine;
use crate::error::{AnalysisError, Result};
use crate::market::{CoinGeckoClient, CoinGeckoConfig, MarketDataClient, MockMarketData};
use crate::sustainability::SustainabilityTable;

/// Which market data backend to use
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProviderKind {
    #[default]
    CoinGecko,
    Mock,
}

impl FromStr for ProviderKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "coingecko" => Ok(Self::CoinGecko),
            "mock" => Ok(Self::Mock),
            other => Err(AnalysisError::Config(format!(
                "unknown market data provider '{other}' (expected 'coingecko' or 'mock')"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub provider: ProviderKind,
    pub coingecko: CoinGeckoConfig,

    /// Default lookback for trend analysis
    pub window_days: u32,

    /// JSON file replacing the built-in sustainability table
    pub sustainability_table: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            coingecko: CoinGeckoConfig::default(),
            window_days: DEFAULT_WINDOW_DAYS,
            sustainability_table: None,
        }
    }
}

impl AnalysisConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key → value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let number = |key: &str, default: u64| {
            var(key).and_then(|v| v.trim().parse().ok()).unwrap_or(default)
        };

        let provider = match var("MARKET_DATA_PROVIDER") {
            Some(name) => name.parse()?,
            None => defaults.provider,
        };

        let coingecko = CoinGeckoConfig {
            base_url: var("COINGECKO_BASE_URL").unwrap_or(defaults.coingecko.base_url),
            api_key: var("COINGECKO_API_KEY"),
            timeout_secs: number("COINGECKO_TIMEOUT_SECS", defaults.coingecko.timeout_secs),
            cache_ttl_secs: number("COINGECKO_CACHE_TTL_SECS", defaults.coingecko.cache_ttl_secs),
        };

        let window_days = var("TREND_WINDOW_DAYS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.window_days);

        Ok(Self {
            provider,
            coingecko,
            window_days,
            sustainability_table: var("SUSTAINABILITY_TABLE").map(PathBuf::from),
        })
    }

    pub fn load_sustainability(&self) -> Result<SustainabilityTable> {
        match &self.sustainability_table {
            Some(path) => SustainabilityTable::from_json_file(path),
            None => Ok(SustainabilityTable::builtin()),
        }
    }

    pub fn build_client(&self) -> Result<Arc<dyn MarketDataClient>> {
        let client: Arc<dyn MarketDataClient> = match self.provider {
            ProviderKind::CoinGecko => Arc::new(
                CoinGeckoClient::new(self.coingecko.clone())
                    .map_err(|e| AnalysisError::Config(e.to_string()))?,
            ),
            ProviderKind::Mock => Arc::new(MockMarketData::new()),
        };
        Ok(client)
    }

    /// Client, ratings, and engine wired together
    pub fn build_analyst(&self) -> Result<Analyst> {
        let engine = RecommendationEngine::new(Arc::new(self.load_sustainability()?));
        Analyst::new(self.build_client()?, engine).with_window_days(self.window_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AnalysisConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AnalysisConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.coingecko.timeout_secs, 10);
        assert_eq!(config.window_days, 7);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("MARKET_DATA_PROVIDER", "Mock"),
            ("COINGECKO_API_KEY", "cg-demo"),
            ("COINGECKO_TIMEOUT_SECS", "3"),
            ("TREND_WINDOW_DAYS", "30"),
            ("SUSTAINABILITY_TABLE", "/etc/ratings.json"),
        ])
        .unwrap();

        assert_eq!(config.provider, ProviderKind::Mock);
        assert_eq!(config.coingecko.api_key.as_deref(), Some("cg-demo"));
        assert_eq!(config.coingecko.timeout_secs, 3);
        assert_eq!(config.coingecko.cache_ttl_secs, 300);
        assert_eq!(config.window_days, 30);
        assert_eq!(config.sustainability_table, Some(PathBuf::from("/etc/ratings.json")));
    }

    #[test]
    fn test_unparseable_numbers_fall_back() {
        let config = config_from(&[("COINGECKO_TIMEOUT_SECS", "soon"), ("TREND_WINDOW_DAYS", "")])
            .unwrap();
        assert_eq!(config.coingecko.timeout_secs, 10);
        assert_eq!(config.window_days, 7);
    }

    #[test]
    fn test_unknown_provider_is_config_error() {
        let err = config_from(&[("MARKET_DATA_PROVIDER", "binance")]).unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }

    #[tokio::test]
    async fn test_build_mock_analyst() {
        let config = config_from(&[("MARKET_DATA_PROVIDER", "mock")]).unwrap();
        let analyst = config.build_analyst().unwrap();
        assert_eq!(analyst.client().name(), "MockMarketData");
        assert!(analyst.recommend("ethereum").await.is_ok());
    }

    #[test]
    fn test_invalid_window_rejected_at_build() {
        let config = config_from(&[("MARKET_DATA_PROVIDER", "mock"), ("TREND_WINDOW_DAYS", "0")])
            .unwrap();
        assert!(config.build_analyst().is_err());
    }
}
