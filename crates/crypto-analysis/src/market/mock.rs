//! Mock Market Data
//!
//! For testing and demo purposes. Serves fixed daily closes and snapshots
//! so every analysis is reproducible.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{FetchError, MarketDataClient};
use crate::model::{MarketSnapshot, PriceSeries};

#[derive(Clone, Debug)]
struct MockAsset {
    snapshot: MarketSnapshot,
    closes: Vec<Decimal>,
}

/// Mock market data client with static history
#[derive(Clone, Debug)]
pub struct MockMarketData {
    assets: HashMap<String, MockAsset>,
}

impl Default for MockMarketData {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMarketData {
    /// Seeded with a handful of well-known assets
    pub fn new() -> Self {
        let mut mock = Self::empty();
        for (id, rank, changes, market_cap, closes) in seed() {
            let snapshot = MarketSnapshot::new(id)
                .with_rank(rank)
                .with_changes(changes.0, changes.1, changes.2)
                .with_market_cap(market_cap);
            mock = mock.with_asset(snapshot, closes);
        }
        mock
    }

    /// No assets at all
    pub fn empty() -> Self {
        Self {
            assets: HashMap::new(),
        }
    }

    /// Add or replace an asset. `closes` are daily, oldest first.
    pub fn with_asset(mut self, snapshot: MarketSnapshot, closes: Vec<Decimal>) -> Self {
        self.assets.insert(
            snapshot.asset_id.to_lowercase(),
            MockAsset { snapshot, closes },
        );
        self
    }

    pub fn asset_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.assets.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    fn asset(&self, asset_id: &str) -> Result<&MockAsset, FetchError> {
        self.assets
            .get(&asset_id.to_lowercase())
            .ok_or_else(|| FetchError::UnknownAsset(asset_id.to_string()))
    }
}

#[async_trait]
impl MarketDataClient for MockMarketData {
    async fn fetch_price_series(
        &self,
        asset_id: &str,
        window_days: u32,
    ) -> Result<PriceSeries, FetchError> {
        let asset = self.asset(asset_id)?;

        // A window of N days spans N + 1 daily closes
        let wanted = usize::try_from(window_days).unwrap_or(usize::MAX).saturating_add(1);
        let skip = asset.closes.len().saturating_sub(wanted);
        let closes = &asset.closes[skip..];

        let span = i64::try_from(closes.len()).unwrap_or(0).saturating_sub(1);
        let start = Utc::now() - Duration::days(span);

        PriceSeries::from_daily_closes(start, closes).map_err(|e| FetchError::Decode(e.to_string()))
    }

    async fn fetch_market_snapshot(&self, asset_id: &str) -> Result<MarketSnapshot, FetchError> {
        Ok(self.asset(asset_id)?.snapshot.clone())
    }

    async fn health_check(&self) -> bool {
        true // Mock always healthy
    }

    fn name(&self) -> &str {
        "MockMarketData"
    }
}

type Seed = (&'static str, u32, (Decimal, Decimal, Decimal), Decimal, Vec<Decimal>);

/// (id, rank, (24h, 7d, 30d change %), market cap, 15 daily closes)
fn seed() -> Vec<Seed> {
    vec![
        (
            "bitcoin",
            1,
            (dec!(1.1), dec!(7.5), dec!(14.9)),
            dec!(1_380_000_000_000),
            vec![
                dec!(61000), dec!(61800), dec!(62500), dec!(62100), dec!(63000),
                dec!(63900), dec!(64800), dec!(65200), dec!(66100), dec!(66900),
                dec!(67500), dec!(68300), dec!(68900), dec!(69400), dec!(70100),
            ],
        ),
        (
            "ethereum",
            2,
            (dec!(0.7), dec!(0.4), dec!(1.3)),
            dec!(412_000_000_000),
            vec![
                dec!(3400), dec!(3420), dec!(3390), dec!(3410), dec!(3440),
                dec!(3405), dec!(3395), dec!(3430), dec!(3415), dec!(3400),
                dec!(3425), dec!(3410), dec!(3435), dec!(3420), dec!(3445),
            ],
        ),
        (
            "solana",
            5,
            (dec!(-2.4), dec!(-1.7), dec!(22.8)),
            dec!(78_000_000_000),
            vec![
                dec!(140), dec!(152), dec!(138), dec!(160), dec!(145),
                dec!(170), dec!(150), dec!(175), dec!(158), dec!(182),
                dec!(160), dec!(190), dec!(168), dec!(195), dec!(172),
            ],
        ),
        (
            "dogecoin",
            8,
            (dec!(9.4), dec!(31.2), dec!(48.0)),
            dec!(24_000_000_000),
            vec![
                dec!(0.120), dec!(0.118), dec!(0.125), dec!(0.131), dec!(0.127),
                dec!(0.140), dec!(0.152), dec!(0.129), dec!(0.148), dec!(0.171),
                dec!(0.145), dec!(0.168), dec!(0.196), dec!(0.162), dec!(0.190),
            ],
        ),
        (
            "cardano",
            9,
            (dec!(-0.8), dec!(-7.9), dec!(-15.2)),
            dec!(19_000_000_000),
            vec![
                dec!(0.620), dec!(0.610), dec!(0.600), dec!(0.590), dec!(0.585),
                dec!(0.580), dec!(0.570), dec!(0.565), dec!(0.560), dec!(0.550),
                dec!(0.545), dec!(0.540), dec!(0.530), dec!(0.525), dec!(0.520),
            ],
        ),
        (
            "polkadot",
            14,
            (dec!(0.2), dec!(-0.6), dec!(-4.1)),
            dec!(10_400_000_000),
            vec![
                dec!(7.30), dec!(7.25), dec!(7.28), dec!(7.20), dec!(7.22),
                dec!(7.18), dec!(7.21), dec!(7.19), dec!(7.24), dec!(7.17),
                dec!(7.20), dec!(7.15), dec!(7.19), dec!(7.16), dec!(7.15),
            ],
        ),
        (
            "polygon",
            22,
            (dec!(-3.5), dec!(-12.4), dec!(-25.0)),
            dec!(5_100_000_000),
            vec![
                dec!(0.700), dec!(0.690), dec!(0.680), dec!(0.660), dec!(0.650),
                dec!(0.640), dec!(0.630), dec!(0.610), dec!(0.600), dec!(0.585),
                dec!(0.570), dec!(0.560), dec!(0.550), dec!(0.540), dec!(0.535),
            ],
        ),
    ]
}
