//! Market Data Integration
//!
//! The data layer the analyzer consumes. Implementations own all network
//! I/O, timeouts, and caching; the engine only ever sees the values they
//! return.

mod cache;
mod coingecko;
mod mock;

pub use cache::{Cached, TtlCache};
pub use coingecko::{CoinGeckoClient, CoinGeckoConfig};
pub use mock::MockMarketData;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{MarketSnapshot, PriceSeries};

/// Data-layer failure. Opaque to the engine.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Unknown asset: {0}")]
    UnknownAsset(String),

    #[error("Provider rate limited the request")]
    RateLimited,

    #[error("Provider returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed provider response: {0}")]
    Decode(String),
}

/// Market data client trait (Strategy pattern)
///
/// Implement this for each provider: CoinGecko, CoinMarketCap, a mock, etc.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Daily price samples covering the last `window_days` days
    async fn fetch_price_series(
        &self,
        asset_id: &str,
        window_days: u32,
    ) -> Result<PriceSeries, FetchError>;

    /// Current rank, percentage changes, and market cap
    async fn fetch_market_snapshot(&self, asset_id: &str) -> Result<MarketSnapshot, FetchError>;

    /// Check if provider is reachable
    async fn health_check(&self) -> bool;

    /// Provider name
    fn name(&self) -> &str;
}
