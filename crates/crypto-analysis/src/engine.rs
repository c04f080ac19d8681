//! Recommendation Engine
//!
//! Scores an asset from four independent factors, evaluated in a fixed
//! order (rank → trend → volatility → sustainability), and maps the total
//! onto a recommendation tier. Every non-zero contribution appends exactly
//! one reason, so `reasons` always mirrors how the score was built.

use std::sync::Arc;

use crate::error::{AnalysisError, Result};
use crate::ladder::{Bound, Ladder};
use crate::model::{
    MarketSnapshot, PriceSeries, Recommendation, RecommendationResult, RiskLevel, Trend,
};
use crate::sustainability::SustainabilityTable;
use crate::trend;

/// A single factor's contribution to the score
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Factor {
    pub points: i32,
    pub reason: &'static str,
}

impl Factor {
    pub const fn new(points: i32, reason: &'static str) -> Self {
        Self { points, reason }
    }
}

const RANK_RUNGS: &[(Bound<u32>, Factor)] = &[
    (Bound::AtMost(10), Factor::new(3, "Top 10 cryptocurrency by market cap")),
    (Bound::AtMost(50), Factor::new(2, "Established cryptocurrency (top 50)")),
    (Bound::AtMost(100), Factor::new(1, "Mid-cap cryptocurrency")),
];

pub const RANK_LADDER: Ladder<u32, Factor> = Ladder::new(
    RANK_RUNGS,
    Factor::new(-1, "Small-cap cryptocurrency (higher risk)"),
);

const SUSTAINABILITY_RUNGS: &[(Bound<u8>, Option<Factor>)] = &[
    (Bound::AtLeast(8), Some(Factor::new(1, "Highly sustainable (eco-friendly)"))),
    (Bound::AtMost(3), Some(Factor::new(-1, "Low sustainability score"))),
];

pub const SUSTAINABILITY_LADDER: Ladder<u8, Option<Factor>> =
    Ladder::new(SUSTAINABILITY_RUNGS, None);

const TIER_RUNGS: &[(Bound<i32>, Recommendation)] = &[
    (Bound::AtLeast(4), Recommendation::StrongBuy),
    (Bound::AtLeast(2), Recommendation::Buy),
    (Bound::AtLeast(0), Recommendation::Hold),
    (Bound::AtLeast(-2), Recommendation::WeakSell),
];

pub const TIER_LADDER: Ladder<i32, Recommendation> =
    Ladder::new(TIER_RUNGS, Recommendation::StrongSell);

/// Contribution of the price trend
pub fn trend_factor(trend: Trend) -> Option<Factor> {
    match trend {
        Trend::StronglyBullish => Some(Factor::new(2, "Strong upward price momentum")),
        Trend::Bullish => Some(Factor::new(1, "Positive price trend")),
        Trend::Sideways => None,
        Trend::Bearish => Some(Factor::new(-1, "Negative price trend")),
        Trend::StronglyBearish => Some(Factor::new(-2, "Strong downward price trend")),
    }
}

/// Contribution of the volatility-derived risk level
pub fn volatility_factor(risk: RiskLevel) -> Option<Factor> {
    match risk {
        RiskLevel::VeryHigh => Some(Factor::new(-2, "Very high volatility (extreme risk)")),
        RiskLevel::High => Some(Factor::new(-1, "High volatility")),
        RiskLevel::Medium => None,
        RiskLevel::Low => Some(Factor::new(1, "Low volatility (more stable)")),
    }
}

/// Running score with its reasons kept in lockstep
#[derive(Debug, Default)]
struct Scorecard {
    score: i32,
    reasons: Vec<String>,
}

impl Scorecard {
    fn apply(&mut self, factor: Option<Factor>) {
        if let Some(factor) = factor {
            tracing::debug!(points = factor.points, reason = factor.reason, "Factor applied");
            self.score += factor.points;
            self.reasons.push(factor.reason.to_string());
        }
    }
}

/// Stateless scorer. Cheap to clone; the ratings table is shared.
#[derive(Clone, Debug, Default)]
pub struct RecommendationEngine {
    sustainability: Arc<SustainabilityTable>,
}

impl RecommendationEngine {
    pub fn new(sustainability: Arc<SustainabilityTable>) -> Self {
        Self { sustainability }
    }

    pub fn sustainability(&self) -> &SustainabilityTable {
        &self.sustainability
    }

    /// Score one asset from its snapshot and recent price history
    pub fn recommend(
        &self,
        snapshot: &MarketSnapshot,
        series: &PriceSeries,
    ) -> Result<RecommendationResult> {
        let asset_id = snapshot.asset_id.as_str();

        let market = snapshot.figures()?;
        let rank = snapshot.effective_rank()?;
        let trend_analysis = trend::analyze(series)
            .map_err(|e| AnalysisError::unavailable(asset_id, e.to_string()))?;
        let sustainability = self.sustainability.lookup(asset_id).clone();

        let mut card = Scorecard::default();
        card.apply(Some(RANK_LADDER.classify(&rank)));
        card.apply(trend_factor(trend_analysis.trend));
        card.apply(volatility_factor(trend_analysis.risk_level));
        card.apply(SUSTAINABILITY_LADDER.classify(&sustainability.score));

        let recommendation = TIER_LADDER.classify(&card.score);

        tracing::info!(
            asset_id,
            score = card.score,
            %recommendation,
            "Generated recommendation"
        );

        Ok(RecommendationResult {
            asset_id: asset_id.to_string(),
            recommendation,
            score: card.score,
            reasons: card.reasons,
            risk_warning: recommendation.risk_warning().to_string(),
            trend_analysis,
            sustainability,
            market_cap_rank: rank,
            market,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::sustainability::SustainabilityEntry;

    fn engine_with(asset_id: &str, score: u8) -> RecommendationEngine {
        let table = SustainabilityTable::new([(
            asset_id.to_string(),
            SustainabilityEntry::new(score, "n/a", "test"),
        )])
        .unwrap();
        RecommendationEngine::new(Arc::new(table))
    }

    fn snapshot(asset_id: &str, rank: u32) -> MarketSnapshot {
        MarketSnapshot::new(asset_id)
            .with_rank(rank)
            .with_changes(dec!(1.5), dec!(4.2), dec!(-8.0))
            .with_market_cap(dec!(50_000_000_000))
    }

    fn series(closes: &[Decimal]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        PriceSeries::from_daily_closes(start, closes).unwrap()
    }

    /// +12% over the window with < 5% daily swings: strongly bullish, low risk
    fn rally() -> PriceSeries {
        series(&[dec!(100), dec!(103), dec!(106), dec!(109), dec!(112)])
    }

    /// -30% with > 15% daily swings: strongly bearish, very high risk
    fn crash() -> PriceSeries {
        series(&[dec!(100), dec!(80), dec!(96), dec!(70)])
    }

    #[test]
    fn test_strong_buy_scenario() {
        let engine = engine_with("alpha", 9);
        let result = engine.recommend(&snapshot("alpha", 5), &rally()).unwrap();

        assert_eq!(result.trend_analysis.trend, Trend::StronglyBullish);
        assert_eq!(result.trend_analysis.risk_level, RiskLevel::Low);
        assert_eq!(result.score, 7);
        assert_eq!(result.recommendation, Recommendation::StrongBuy);
        assert_eq!(result.risk_warning, "Consider for long-term investment");
        assert_eq!(
            result.reasons,
            vec![
                "Top 10 cryptocurrency by market cap",
                "Strong upward price momentum",
                "Low volatility (more stable)",
                "Highly sustainable (eco-friendly)",
            ]
        );
    }

    #[test]
    fn test_strong_sell_scenario() {
        let engine = engine_with("omega", 2);
        let result = engine.recommend(&snapshot("omega", 500), &crash()).unwrap();

        assert_eq!(result.trend_analysis.trend, Trend::StronglyBearish);
        assert_eq!(result.trend_analysis.risk_level, RiskLevel::VeryHigh);
        assert_eq!(result.score, -6);
        assert_eq!(result.recommendation, Recommendation::StrongSell);
        assert_eq!(
            result.reasons,
            vec![
                "Small-cap cryptocurrency (higher risk)",
                "Strong downward price trend",
                "Very high volatility (extreme risk)",
                "Low sustainability score",
            ]
        );
    }

    #[test]
    fn test_neutral_factors_add_no_reason() {
        // rank 30 (+2), sideways, medium risk, unknown asset → neutral sustainability
        let engine = RecommendationEngine::default();
        let choppy = series(&[dec!(100), dec!(106), dec!(100), dec!(106), dec!(101)]);
        let result = engine.recommend(&snapshot("unknown-coin", 30), &choppy).unwrap();

        assert_eq!(result.trend_analysis.trend, Trend::Sideways);
        assert_eq!(result.trend_analysis.risk_level, RiskLevel::Medium);
        assert_eq!(result.sustainability.score, 5);
        assert_eq!(result.score, 2);
        assert_eq!(result.reasons, vec!["Established cryptocurrency (top 50)"]);
        assert_eq!(result.recommendation, Recommendation::Buy);
    }

    #[test]
    fn test_missing_rank_scores_as_small_cap() {
        let engine = RecommendationEngine::default();
        let mut snap = snapshot("mystery", 1);
        snap.market_cap_rank = None;

        let result = engine.recommend(&snap, &rally()).unwrap();
        assert_eq!(result.market_cap_rank, 999);
        assert_eq!(result.reasons[0], "Small-cap cryptocurrency (higher risk)");
        // -1 + 2 + 1 + 0
        assert_eq!(result.score, 2);
    }

    #[test]
    fn test_insufficient_series_is_unavailable() {
        let engine = RecommendationEngine::default();
        let err = engine
            .recommend(&snapshot("bitcoin", 1), &series(&[dec!(100)]))
            .unwrap_err();
        assert_eq!(err.code(), "UNAVAILABLE");
    }

    #[test]
    fn test_missing_field_is_unavailable() {
        let engine = RecommendationEngine::default();
        let mut snap = snapshot("bitcoin", 1);
        snap.price_change_pct_30d = None;

        match engine.recommend(&snap, &rally()) {
            Err(AnalysisError::Unavailable { asset_id, reason }) => {
                assert_eq!(asset_id, "bitcoin");
                assert!(reason.contains("price_change_pct_30d"));
            }
            other => panic!("expected unavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_rank_ladder_edges() {
        assert_eq!(RANK_LADDER.classify(&1).points, 3);
        assert_eq!(RANK_LADDER.classify(&10).points, 3);
        assert_eq!(RANK_LADDER.classify(&11).points, 2);
        assert_eq!(RANK_LADDER.classify(&50).points, 2);
        assert_eq!(RANK_LADDER.classify(&100).points, 1);
        assert_eq!(RANK_LADDER.classify(&101).points, -1);
    }

    #[test]
    fn test_sustainability_band() {
        assert_eq!(SUSTAINABILITY_LADDER.classify(&8).map(|f| f.points), Some(1));
        assert_eq!(SUSTAINABILITY_LADDER.classify(&3).map(|f| f.points), Some(-1));
        for neutral in 4..=7 {
            assert!(SUSTAINABILITY_LADDER.classify(&neutral).is_none());
        }
    }

    #[test]
    fn test_tier_ladder_edges() {
        assert_eq!(TIER_LADDER.classify(&4), Recommendation::StrongBuy);
        assert_eq!(TIER_LADDER.classify(&3), Recommendation::Buy);
        assert_eq!(TIER_LADDER.classify(&2), Recommendation::Buy);
        assert_eq!(TIER_LADDER.classify(&0), Recommendation::Hold);
        assert_eq!(TIER_LADDER.classify(&-2), Recommendation::WeakSell);
        assert_eq!(TIER_LADDER.classify(&-3), Recommendation::StrongSell);
    }

    #[test]
    fn test_reason_count_matches_non_zero_factors() {
        let engine = RecommendationEngine::default();
        let result = engine.recommend(&snapshot("ethereum", 2), &crash()).unwrap();
        let expected: i32 = 3 - 2 - 2 + 1;
        assert_eq!(result.score, expected);
        assert_eq!(result.reasons.len(), 4);
        assert_eq!(result.recommendation, Recommendation::Hold);
    }
}
