//! Domain Models
//!
//! Value types flowing between the data layer, the analyzer, and the engine.
//! Uses `rust_decimal` for every price and percentage - never f64 for money!

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::sustainability::SustainabilityEntry;

/// Rank assumed when the data layer does not report one
pub const DEFAULT_MARKET_CAP_RANK: u32 = 999;

/// A single price observation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, price: Decimal) -> Self {
        Self { timestamp, price }
    }
}

/// Chronological price samples over a lookback window.
///
/// Every price is strictly positive and timestamps never go backwards.
/// Empty and single-sample series are valid values; the trend analyzer is
/// the one that rejects them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self> {
        for (i, point) in points.iter().enumerate() {
            if point.price <= Decimal::ZERO {
                return Err(AnalysisError::InvalidSeries(format!(
                    "sample {i} has non-positive price {}",
                    point.price
                )));
            }
        }

        if let Some(i) = points
            .windows(2)
            .position(|pair| pair[1].timestamp < pair[0].timestamp)
        {
            return Err(AnalysisError::InvalidSeries(format!(
                "sample {} is earlier than sample {i}",
                i + 1
            )));
        }

        Ok(Self { points })
    }

    /// Build a series of daily closes starting at `start`
    pub fn from_daily_closes(start: DateTime<Utc>, closes: &[Decimal]) -> Result<Self> {
        let points = closes
            .iter()
            .zip(0_i64..)
            .map(|(&price, day)| PricePoint::new(start + Duration::days(day), price))
            .collect();
        Self::new(points)
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

impl TryFrom<Vec<PricePoint>> for PriceSeries {
    type Error = AnalysisError;

    fn try_from(points: Vec<PricePoint>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<PriceSeries> for Vec<PricePoint> {
    fn from(series: PriceSeries) -> Self {
        series.points
    }
}

/// Net price direction over the window
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    StronglyBullish,
    Bullish,
    Sideways,
    Bearish,
    StronglyBearish,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StronglyBullish => "strongly_bullish",
            Self::Bullish => "bullish",
            Self::Sideways => "sideways",
            Self::Bearish => "bearish",
            Self::StronglyBearish => "strongly_bearish",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk classification derived from volatility
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::VeryHigh => "very_high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the trend analyzer. Decimals are rounded to 2 places.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendResult {
    pub trend: Trend,
    pub change_percent: Decimal,
    pub volatility: Decimal,
    pub risk_level: RiskLevel,
    pub start_price: Decimal,
    pub end_price: Decimal,
    /// Number of samples the result was computed from
    pub samples: usize,
}

/// Market attributes as delivered by the data layer.
///
/// Numeric fields are optional because providers omit them for thinly
/// traded assets. Only the rank has a default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub asset_id: String,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub price_change_pct_24h: Option<Decimal>,
    #[serde(default)]
    pub price_change_pct_7d: Option<Decimal>,
    #[serde(default)]
    pub price_change_pct_30d: Option<Decimal>,
    #[serde(default)]
    pub market_cap_usd: Option<Decimal>,
}

impl MarketSnapshot {
    pub fn new(asset_id: impl Into<String>) -> Self {
        Self {
            asset_id: asset_id.into(),
            market_cap_rank: None,
            price_change_pct_24h: None,
            price_change_pct_7d: None,
            price_change_pct_30d: None,
            market_cap_usd: None,
        }
    }

    pub fn with_rank(mut self, rank: u32) -> Self {
        self.market_cap_rank = Some(rank);
        self
    }

    pub fn with_changes(mut self, pct_24h: Decimal, pct_7d: Decimal, pct_30d: Decimal) -> Self {
        self.price_change_pct_24h = Some(pct_24h);
        self.price_change_pct_7d = Some(pct_7d);
        self.price_change_pct_30d = Some(pct_30d);
        self
    }

    pub fn with_market_cap(mut self, market_cap_usd: Decimal) -> Self {
        self.market_cap_usd = Some(market_cap_usd);
        self
    }

    /// Rank with the documented fallback for unranked assets.
    /// A reported rank of 0 is malformed.
    pub fn effective_rank(&self) -> Result<u32> {
        match self.market_cap_rank {
            None => Ok(DEFAULT_MARKET_CAP_RANK),
            Some(0) => Err(AnalysisError::unavailable(
                &self.asset_id,
                "market cap rank must be positive",
            )),
            Some(rank) => Ok(rank),
        }
    }

    /// Validate the required numeric fields
    pub fn figures(&self) -> Result<MarketFigures> {
        let require = |value: Option<Decimal>, field: &str| {
            value.ok_or_else(|| {
                AnalysisError::unavailable(&self.asset_id, format!("missing {field}"))
            })
        };

        Ok(MarketFigures {
            price_change_pct_24h: require(self.price_change_pct_24h, "price_change_pct_24h")?,
            price_change_pct_7d: require(self.price_change_pct_7d, "price_change_pct_7d")?,
            price_change_pct_30d: require(self.price_change_pct_30d, "price_change_pct_30d")?,
            market_cap_usd: require(self.market_cap_usd, "market_cap_usd")?,
        })
    }
}

/// Required snapshot figures after validation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketFigures {
    pub price_change_pct_24h: Decimal,
    pub price_change_pct_7d: Decimal,
    pub price_change_pct_30d: Decimal,
    pub market_cap_usd: Decimal,
}

/// Snapshot and series for one asset, as fetched together
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub snapshot: MarketSnapshot,
    pub series: PriceSeries,
}

impl Observation {
    pub fn new(snapshot: MarketSnapshot, series: PriceSeries) -> Self {
        Self { snapshot, series }
    }

    pub fn asset_id(&self) -> &str {
        &self.snapshot.asset_id
    }
}

/// Recommendation tier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "HOLD/NEUTRAL")]
    Hold,
    #[serde(rename = "WEAK SELL")]
    WeakSell,
    #[serde(rename = "STRONG SELL")]
    StrongSell,
}

impl Recommendation {
    pub fn label(self) -> &'static str {
        match self {
            Self::StrongBuy => "STRONG BUY",
            Self::Buy => "BUY",
            Self::Hold => "HOLD/NEUTRAL",
            Self::WeakSell => "WEAK SELL",
            Self::StrongSell => "STRONG SELL",
        }
    }

    pub fn risk_warning(self) -> &'static str {
        match self {
            Self::StrongBuy => "Consider for long-term investment",
            Self::Buy => "Good investment potential with moderate risk",
            Self::Hold => "Mixed signals - proceed with caution",
            Self::WeakSell => "High risk - consider reducing position",
            Self::StrongSell => "Very high risk - avoid or exit position",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Engine output for one asset
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub asset_id: String,
    pub recommendation: Recommendation,
    pub score: i32,
    /// One entry per non-zero factor, in evaluation order
    pub reasons: Vec<String>,
    pub risk_warning: String,
    pub trend_analysis: TrendResult,
    pub sustainability: SustainabilityEntry,
    pub market_cap_rank: u32,
    pub market: MarketFigures,
}

/// One side of a comparison
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparedAsset {
    pub asset_id: String,
    pub result: RecommendationResult,
}

/// Comparison outcome. Serialized as the asset id or `"tie"`.
///
/// The string form is ambiguous for an asset whose id is literally `tie`:
/// such a win serializes as `"tie"` and reads back as [`Winner::Tie`].
/// Compare the two sides' scores in [`ComparisonResult`] when that matters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Winner {
    Asset(String),
    Tie,
}

impl Winner {
    pub const TIE: &'static str = "tie";

    pub fn as_str(&self) -> &str {
        match self {
            Self::Asset(id) => id,
            Self::Tie => Self::TIE,
        }
    }
}

impl From<String> for Winner {
    fn from(value: String) -> Self {
        if value == Self::TIE {
            Self::Tie
        } else {
            Self::Asset(value)
        }
    }
}

impl From<Winner> for String {
    fn from(winner: Winner) -> Self {
        match winner {
            Winner::Asset(id) => id,
            Winner::Tie => Winner::TIE.into(),
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two recommendations ranked by score
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub left: ComparedAsset,
    pub right: ComparedAsset,
    pub winner: Winner,
    pub reason: String,
}
