//! Comparator
//!
//! Runs the engine on two assets and ranks them by score.

use std::cmp::Ordering;

use crate::engine::RecommendationEngine;
use crate::error::Result;
use crate::model::{ComparedAsset, ComparisonResult, Observation, RecommendationResult, Winner};

pub const TIE_REASON: &str = "Both cryptocurrencies have similar recommendation scores";

/// Score both observations and pick the winner
pub fn compare(
    engine: &RecommendationEngine,
    left: &Observation,
    right: &Observation,
) -> Result<ComparisonResult> {
    let left_result = engine.recommend(&left.snapshot, &left.series)?;
    let right_result = engine.recommend(&right.snapshot, &right.series)?;
    Ok(rank(left_result, right_result))
}

/// Rank two finished recommendations. The higher score strictly wins.
pub fn rank(left: RecommendationResult, right: RecommendationResult) -> ComparisonResult {
    let (winner, reason) = match left.score.cmp(&right.score) {
        Ordering::Greater => (
            Winner::Asset(left.asset_id.clone()),
            higher_score_reason(&left.asset_id, left.score, right.score),
        ),
        Ordering::Less => (
            Winner::Asset(right.asset_id.clone()),
            higher_score_reason(&right.asset_id, right.score, left.score),
        ),
        Ordering::Equal => (Winner::Tie, TIE_REASON.to_string()),
    };

    tracing::info!(
        left = %left.asset_id,
        right = %right.asset_id,
        %winner,
        "Compared assets"
    );

    ComparisonResult {
        left: ComparedAsset {
            asset_id: left.asset_id.clone(),
            result: left,
        },
        right: ComparedAsset {
            asset_id: right.asset_id.clone(),
            result: right,
        },
        winner,
        reason,
    }
}

fn higher_score_reason(asset_id: &str, winning: i32, losing: i32) -> String {
    format!("{asset_id} has a higher recommendation score ({winning} vs {losing})")
}
