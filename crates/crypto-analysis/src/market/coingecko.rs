//! CoinGecko Client
//!
//! `MarketDataClient` backed by the public CoinGecko v3 REST API.
//! Responses are cached per asset; when a refresh fails an expired entry is
//! served instead of the error.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::cache::{Cached, TtlCache};
use super::{FetchError, MarketDataClient};
use crate::model::{MarketSnapshot, PricePoint, PriceSeries};

/// CoinGecko client configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoinGeckoConfig {
    /// API root, without trailing slash
    pub base_url: String,

    /// Demo/pro API key, sent as `x-cg-demo-api-key`
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// How long a response is served from cache
    pub cache_ttl_secs: u64,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.coingecko.com/api/v3".into(),
            api_key: None,
            timeout_secs: 10,
            cache_ttl_secs: 300,
        }
    }
}

/// CoinGecko market data provider
pub struct CoinGeckoClient {
    http: reqwest::Client,
    config: CoinGeckoConfig,
    series_cache: TtlCache<PriceSeries>,
    snapshot_cache: TtlCache<MarketSnapshot>,
}

impl CoinGeckoClient {
    pub fn new(config: CoinGeckoConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("crypto-analysis/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let ttl = Duration::from_secs(config.cache_ttl_secs);

        Ok(Self {
            http,
            series_cache: TtlCache::new(ttl),
            snapshot_cache: TtlCache::new(ttl),
            config,
        })
    }

    pub fn config(&self) -> &CoinGeckoConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        asset_id: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);

        let mut request = self.http.get(&url).query(query);
        if let Some(key) = &self.config.api_key {
            request = request.header("x-cg-demo-api-key", key);
        }

        let response = request.send().await?;
        if let Some(err) = status_error(response.status(), asset_id, url) {
            return Err(err);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Error for a non-2xx response, `None` on success
fn status_error(status: StatusCode, asset_id: &str, url: String) -> Option<FetchError> {
    match status {
        StatusCode::NOT_FOUND => Some(FetchError::UnknownAsset(asset_id.to_string())),
        StatusCode::TOO_MANY_REQUESTS => Some(FetchError::RateLimited),
        s if s.is_success() => None,
        s => Some(FetchError::Status {
            status: s.as_u16(),
            url,
        }),
    }
}

/// Serve fresh cache hits, refresh otherwise, fall back to stale on error
async fn through_cache<V, F>(cache: &TtlCache<V>, key: String, fetch: F) -> Result<V, FetchError>
where
    V: Clone,
    F: Future<Output = Result<V, FetchError>>,
{
    let stale = match cache.get(&key).await {
        Cached::Fresh(value) => {
            tracing::debug!("Cache hit: {}", key);
            return Ok(value);
        }
        Cached::Stale(value) => Some(value),
        Cached::Missing => None,
    };

    match fetch.await {
        Ok(value) => {
            cache.insert(key, value.clone()).await;
            Ok(value)
        }
        Err(e) => match stale {
            Some(value) => {
                tracing::warn!("Refresh of {} failed ({}), serving stale data", key, e);
                Ok(value)
            }
            None => Err(e),
        },
    }
}

#[async_trait]
impl MarketDataClient for CoinGeckoClient {
    async fn fetch_price_series(
        &self,
        asset_id: &str,
        window_days: u32,
    ) -> Result<PriceSeries, FetchError> {
        let key = format!("series:{asset_id}:{window_days}");
        let fetch = async {
            let chart: MarketChart = self
                .get_json(
                    asset_id,
                    &format!("coins/{asset_id}/market_chart"),
                    &[
                        ("vs_currency", "usd".into()),
                        ("days", window_days.to_string()),
                        ("interval", "daily".into()),
                    ],
                )
                .await?;
            series_from_chart(chart)
        };
        through_cache(&self.series_cache, key, fetch).await
    }

    async fn fetch_market_snapshot(&self, asset_id: &str) -> Result<MarketSnapshot, FetchError> {
        let key = format!("snapshot:{asset_id}");
        let fetch = async {
            let coin: CoinDetail = self
                .get_json(
                    asset_id,
                    &format!("coins/{asset_id}"),
                    &[
                        ("localization", "false".into()),
                        ("tickers", "false".into()),
                        ("market_data", "true".into()),
                        ("community_data", "false".into()),
                        ("developer_data", "false".into()),
                    ],
                )
                .await?;
            Ok::<_, FetchError>(snapshot_from_coin(asset_id, coin))
        };
        through_cache(&self.snapshot_cache, key, fetch).await
    }

    async fn health_check(&self) -> bool {
        match self.http.get(self.url("ping")).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("CoinGecko health check failed: {}", e);
                false
            }
        }
    }

    fn name(&self) -> &str {
        "CoinGecko"
    }
}

// ============================================================================
// Wire Types
// ============================================================================

/// `GET /coins/{id}/market_chart` body; `prices` is `[[unix_ms, price], ...]`
#[derive(Debug, Deserialize)]
struct MarketChart {
    prices: Vec<(f64, f64)>,
}

/// Subset of `GET /coins/{id}` we read
#[derive(Debug, Deserialize)]
struct CoinDetail {
    #[serde(default)]
    market_cap_rank: Option<u32>,
    #[serde(default)]
    market_data: Option<CoinMarketData>,
}

#[derive(Debug, Default, Deserialize)]
struct CoinMarketData {
    #[serde(default)]
    price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    price_change_percentage_7d: Option<f64>,
    #[serde(default)]
    price_change_percentage_30d: Option<f64>,
    #[serde(default)]
    market_cap: Option<CurrencyMap>,
}

#[derive(Debug, Default, Deserialize)]
struct CurrencyMap {
    #[serde(default)]
    usd: Option<f64>,
}

#[allow(clippy::cast_possible_truncation)]
fn series_from_chart(chart: MarketChart) -> Result<PriceSeries, FetchError> {
    let points = chart
        .prices
        .into_iter()
        .map(|(millis, price)| {
            let timestamp = DateTime::from_timestamp_millis(millis as i64)
                .ok_or_else(|| FetchError::Decode(format!("invalid timestamp {millis}")))?;
            let price = Decimal::from_f64(price)
                .ok_or_else(|| FetchError::Decode(format!("invalid price {price}")))?;
            Ok(PricePoint::new(timestamp, price))
        })
        .collect::<Result<Vec<_>, FetchError>>()?;

    PriceSeries::new(points).map_err(|e| FetchError::Decode(e.to_string()))
}

/// Absent figures stay absent; the engine decides whether that is fatal
fn snapshot_from_coin(asset_id: &str, coin: CoinDetail) -> MarketSnapshot {
    let data = coin.market_data.unwrap_or_default();
    let decimal = |value: Option<f64>| value.and_then(Decimal::from_f64);

    MarketSnapshot {
        asset_id: asset_id.to_string(),
        market_cap_rank: coin.market_cap_rank,
        price_change_pct_24h: decimal(data.price_change_percentage_24h),
        price_change_pct_7d: decimal(data.price_change_percentage_7d),
        price_change_pct_30d: decimal(data.price_change_percentage_30d),
        market_cap_usd: decimal(data.market_cap.and_then(|cap| cap.usd)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const CHART_URL: &str = "https://api.coingecko.com/api/v3/coins/bitcoin/market_chart";

    #[test]
    fn test_success_status_is_not_an_error() {
        assert!(status_error(StatusCode::OK, "bitcoin", CHART_URL.into()).is_none());
    }

    #[test]
    fn test_not_found_is_unknown_asset() {
        let err = status_error(StatusCode::NOT_FOUND, "notreal", CHART_URL.into());
        assert!(matches!(err, Some(FetchError::UnknownAsset(id)) if id == "notreal"));
    }

    #[test]
    fn test_too_many_requests_is_rate_limited() {
        let err = status_error(StatusCode::TOO_MANY_REQUESTS, "bitcoin", CHART_URL.into());
        assert!(matches!(err, Some(FetchError::RateLimited)));
    }

    #[test]
    fn test_other_failures_keep_status_and_url() {
        for status in [StatusCode::BAD_REQUEST, StatusCode::SERVICE_UNAVAILABLE] {
            match status_error(status, "bitcoin", CHART_URL.into()) {
                Some(FetchError::Status { status: code, url }) => {
                    assert_eq!(code, status.as_u16());
                    assert_eq!(url, CHART_URL);
                }
                other => panic!("expected Status error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_market_chart() {
        let chart: MarketChart = serde_json::from_str(
            r#"{"prices": [[1717200000000, 67500.5], [1717286400000, 68010.25]], "market_caps": [], "total_volumes": []}"#,
        )
        .unwrap();

        let series = series_from_chart(chart).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.first().unwrap().price, dec!(67500.5));
        assert_eq!(series.last().unwrap().price, dec!(68010.25));
    }

    #[test]
    fn test_chart_with_bad_price_is_decode_error() {
        let chart: MarketChart =
            serde_json::from_str(r#"{"prices": [[1717200000000, 0.0]]}"#).unwrap();
        assert!(matches!(series_from_chart(chart), Err(FetchError::Decode(_))));
    }

    #[test]
    fn test_parse_coin_detail() {
        let coin: CoinDetail = serde_json::from_str(
            r#"{
                "id": "cardano",
                "market_cap_rank": 9,
                "market_data": {
                    "price_change_percentage_24h": -0.8,
                    "price_change_percentage_7d": 3.25,
                    "price_change_percentage_30d": 12.5,
                    "market_cap": {"usd": 19000000000, "eur": 17500000000}
                }
            }"#,
        )
        .unwrap();

        let snapshot = snapshot_from_coin("cardano", coin);
        assert_eq!(snapshot.market_cap_rank, Some(9));
        assert_eq!(snapshot.price_change_pct_7d, Some(dec!(3.25)));
        assert_eq!(snapshot.market_cap_usd, Some(dec!(19000000000)));
        assert!(snapshot.figures().is_ok());
    }

    #[test]
    fn test_coin_without_rank_or_data() {
        let coin: CoinDetail =
            serde_json::from_str(r#"{"id": "fresh-token", "market_cap_rank": null}"#).unwrap();

        let snapshot = snapshot_from_coin("fresh-token", coin);
        assert_eq!(snapshot.effective_rank().unwrap(), 999);
        assert!(snapshot.figures().is_err());
    }

    #[tokio::test]
    async fn test_stale_entry_served_on_failure() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.insert("snapshot:bitcoin", 7_u32).await;

        let value = through_cache(&cache, "snapshot:bitcoin".into(), async {
            Err(FetchError::RateLimited)
        })
        .await
        .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_failure_without_cache_propagates() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        let result = through_cache(&cache, "series:x:7".into(), async {
            Err(FetchError::UnknownAsset("x".into()))
        })
        .await;
        assert!(matches!(result, Err(FetchError::UnknownAsset(_))));
    }

    #[tokio::test]
    async fn test_successful_fetch_is_cached() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let first = through_cache(&cache, "k".into(), async { Ok(1_u32) }).await.unwrap();
        let second = through_cache(&cache, "k".into(), async { Ok(2_u32) }).await.unwrap();
        assert_eq!((first, second), (1, 1));
    }
}
