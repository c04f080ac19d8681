//! # crypto-analysis
//!
//! Deterministic trend classification, risk assessment, and buy/sell
//! recommendations for cryptocurrencies.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────────┐   PriceSeries    ┌────────────────┐
//! │ MarketDataClient │ ───────────────▶ │ Trend Analyzer │
//! │ (CoinGecko/mock) │                  └───────┬────────┘
//! └────────┬─────────┘                          │ TrendResult
//!          │ MarketSnapshot                     ▼
//!          └──────────────────────────▶ ┌────────────────┐   ┌────────────────┐
//!                                       │ Recommendation │◀──│ Sustainability │
//!                                       │     Engine     │   │     Table      │
//!                                       └───────┬────────┘   └────────────────┘
//!                                               │ × 2
//!                                               ▼
//!                                       ┌────────────────┐
//!                                       │   Comparator   │
//!                                       └────────────────┘
//! ```
//!
//! ## Scoring
//!
//! | factor         | contribution                                      |
//! |----------------|---------------------------------------------------|
//! | rank           | ≤10 +3, ≤50 +2, ≤100 +1, else −1                  |
//! | trend          | strongly bullish +2 … strongly bearish −2         |
//! | volatility     | low +1, medium 0, high −1, very high −2           |
//! | sustainability | ≥8 +1, ≤3 −1, else 0                              |
//!
//! Total ≥4 STRONG BUY, ≥2 BUY, ≥0 HOLD/NEUTRAL, ≥−2 WEAK SELL, else
//! STRONG SELL.
//!
//! The engine is pure: it never does I/O, keeps no state between calls,
//! and gives the same answer for the same inputs. All fetching happens in
//! [`market`] and is wired in by [`Analyst`].

pub mod analyst;
pub mod compare;
pub mod config;
pub mod engine;
pub mod error;
pub mod ladder;
pub mod market;
pub mod model;
pub mod report;
pub mod sustainability;
pub mod trend;

pub use analyst::{Analyst, DEFAULT_WINDOW_DAYS};
pub use config::{AnalysisConfig, ProviderKind};
pub use engine::RecommendationEngine;
pub use error::{AnalysisError, Result};
pub use market::{FetchError, MarketDataClient};
pub use model::{
    ComparisonResult, MarketSnapshot, Observation, PricePoint, PriceSeries, Recommendation,
    RecommendationResult, RiskLevel, Trend, TrendResult, Winner,
};
pub use sustainability::{SustainabilityEntry, SustainabilityTable};
