//! Analyst Facade
//!
//! Wires the data layer to the engine: fetch, then score. This is the only
//! component that awaits anything; the engine itself stays synchronous.

use std::sync::Arc;

use crate::compare;
use crate::engine::RecommendationEngine;
use crate::error::{AnalysisError, Result};
use crate::market::MarketDataClient;
use crate::model::{ComparisonResult, Observation, RecommendationResult, TrendResult};
use crate::trend;

/// Lookback used when the caller does not pick one
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// Longest lookback accepted
pub const MAX_WINDOW_DAYS: u32 = 365;

pub struct Analyst {
    client: Arc<dyn MarketDataClient>,
    engine: RecommendationEngine,
    window_days: u32,
}

impl Analyst {
    pub fn new(client: Arc<dyn MarketDataClient>, engine: RecommendationEngine) -> Self {
        Self {
            client,
            engine,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }

    /// Override the lookback used by `recommend` and `compare`
    pub fn with_window_days(mut self, window_days: u32) -> Result<Self> {
        self.window_days = validate_window(window_days)?;
        Ok(self)
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    pub fn client(&self) -> &Arc<dyn MarketDataClient> {
        &self.client
    }

    pub fn engine(&self) -> &RecommendationEngine {
        &self.engine
    }

    /// Trend and risk for an asset over `window_days`
    #[tracing::instrument(skip(self))]
    pub async fn analyze_trend(&self, asset_id: &str, window_days: u32) -> Result<TrendResult> {
        let asset_id = normalize_asset_id(asset_id)?;
        let window_days = validate_window(window_days)?;

        let series = self
            .client
            .fetch_price_series(&asset_id, window_days)
            .await
            .map_err(|e| {
                tracing::warn!("Price series fetch failed for {}: {}", asset_id, e);
                AnalysisError::from_fetch(&asset_id, &e)
            })?;

        trend::analyze(&series)
    }

    /// Full recommendation for one asset
    #[tracing::instrument(skip(self))]
    pub async fn recommend(&self, asset_id: &str) -> Result<RecommendationResult> {
        let asset_id = normalize_asset_id(asset_id)?;
        let observation = self.observe(&asset_id).await?;
        self.engine.recommend(&observation.snapshot, &observation.series)
    }

    /// Recommend both assets and rank them
    #[tracing::instrument(skip(self))]
    pub async fn compare(&self, left: &str, right: &str) -> Result<ComparisonResult> {
        let left = normalize_asset_id(left)?;
        let right = normalize_asset_id(right)?;

        let (left, right) = futures::try_join!(self.observe(&left), self.observe(&right))?;
        compare::compare(&self.engine, &left, &right)
    }

    /// Fetch snapshot and series concurrently
    async fn observe(&self, asset_id: &str) -> Result<Observation> {
        let snapshot = async {
            self.client
                .fetch_market_snapshot(asset_id)
                .await
                .map_err(|e| AnalysisError::from_fetch(asset_id, &e))
        };
        let series = async {
            self.client
                .fetch_price_series(asset_id, self.window_days)
                .await
                .map_err(|e| AnalysisError::from_fetch(asset_id, &e))
        };

        let (mut snapshot, series) = futures::try_join!(snapshot, series).inspect_err(|e| {
            tracing::warn!("Market data unavailable: {}", e);
        })?;

        // Providers may echo a differently-cased id; results carry ours
        snapshot.asset_id = asset_id.to_string();

        Ok(Observation::new(snapshot, series))
    }
}

fn normalize_asset_id(raw: &str) -> Result<String> {
    let asset_id = raw.trim().to_lowercase();
    if asset_id.is_empty() {
        return Err(AnalysisError::InvalidInput("asset id is empty".into()));
    }
    if asset_id.contains('/') {
        return Err(AnalysisError::InvalidInput(format!("invalid asset id: {raw}")));
    }
    Ok(asset_id)
}

fn validate_window(window_days: u32) -> Result<u32> {
    if window_days == 0 || window_days > MAX_WINDOW_DAYS {
        return Err(AnalysisError::InvalidInput(format!(
            "window must be between 1 and {MAX_WINDOW_DAYS} days, got {window_days}"
        )));
    }
    Ok(window_days)
}
