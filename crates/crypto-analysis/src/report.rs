//! Plain-text Reports
//!
//! Human-readable summaries of engine output for terminals and chat
//! front-ends.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::model::{ComparisonResult, RecommendationResult, Winner};

const RULE_WIDTH: usize = 50;

/// Render one recommendation
pub fn render_recommendation(result: &RecommendationResult) -> String {
    let trend = &result.trend_analysis;
    let market = &result.market;

    let mut out = format!("{} Analysis\n", result.asset_id.to_uppercase());
    out.push_str(&"═".repeat(RULE_WIDTH));
    out.push('\n');

    out.push_str(&format!("  Recommendation:   {}\n", result.recommendation));
    out.push_str(&format!("  Score:            {}\n", result.score));
    out.push_str(&format!("  Market Cap Rank:  #{}\n", result.market_cap_rank));
    out.push_str(&format!(
        "  Trend:            {} ({} over {} samples)\n",
        trend.trend,
        format_percent(trend.change_percent),
        trend.samples
    ));
    out.push_str(&format!(
        "  Price:            {} → {}\n",
        format_price(trend.start_price),
        format_price(trend.end_price)
    ));
    out.push_str(&format!(
        "  Risk Level:       {} (avg swing {:.2}%)\n",
        trend.risk_level, trend.volatility
    ));

    let sustainability = &result.sustainability;
    out.push_str(&format!("  Sustainability:   {}/10", sustainability.score));
    match (&sustainability.consensus, &sustainability.energy_per_tx) {
        (Some(consensus), Some(energy)) => {
            out.push_str(&format!(" ({consensus}, {energy} per tx)"));
        }
        (Some(consensus), None) => {
            out.push_str(&format!(" ({consensus})"));
        }
        (None, Some(energy)) => {
            out.push_str(&format!(" ({energy} per tx)"));
        }
        (None, None) => {}
    }
    out.push('\n');

    out.push_str(&format!("  Market Cap:       {}\n", format_market_cap(market.market_cap_usd)));
    out.push_str(&format!(
        "  Change 24h/7d/30d: {} / {} / {}\n",
        format_percent(market.price_change_pct_24h),
        format_percent(market.price_change_pct_7d),
        format_percent(market.price_change_pct_30d)
    ));
    out.push_str(&format!("  Risk Warning:     {}\n", result.risk_warning));

    if !result.reasons.is_empty() {
        out.push_str("\nKey Factors:\n");
        for reason in &result.reasons {
            out.push_str(&format!("  • {reason}\n"));
        }
    }

    out
}

/// Render a head-to-head comparison
pub fn render_comparison(comparison: &ComparisonResult) -> String {
    let left = &comparison.left;
    let right = &comparison.right;

    let mut out = format!(
        "{} vs {}\n",
        left.asset_id.to_uppercase(),
        right.asset_id.to_uppercase()
    );
    out.push_str(&"═".repeat(RULE_WIDTH));
    out.push('\n');

    let width = left.asset_id.len().max(right.asset_id.len());
    for side in [left, right] {
        out.push_str(&format!(
            "  {:<width$}  {:<13} score {:>3}  ({} / {} risk)\n",
            side.asset_id,
            side.result.recommendation.label(),
            side.result.score,
            side.result.trend_analysis.trend,
            side.result.trend_analysis.risk_level,
        ));
    }

    out.push('\n');
    match &comparison.winner {
        Winner::Asset(id) => {
            out.push_str(&format!("Winner: {}\n", id.to_uppercase()));
        }
        Winner::Tie => out.push_str("Winner: TIE\n"),
    }
    out.push_str(&format!("Reason: {}\n", comparison.reason));

    out
}

/// `$` price with precision scaled to magnitude
pub fn format_price(price: Decimal) -> String {
    if price < dec!(0.01) {
        format!("${:.6}", price.round_dp(6))
    } else if price < dec!(1) {
        format!("${:.4}", price.round_dp(4))
    } else if price < dec!(100) {
        format!("${:.2}", price.round_dp(2))
    } else {
        format!("${}", group_thousands(price.round_dp(2), 2))
    }
}

/// `$` market cap with T/B/M suffixes
pub fn format_market_cap(market_cap: Decimal) -> String {
    let scales = [
        (dec!(1_000_000_000_000), "T"),
        (dec!(1_000_000_000), "B"),
        (dec!(1_000_000), "M"),
    ];

    for (scale, suffix) in scales {
        if market_cap >= scale {
            return format!("${:.2}{suffix}", (market_cap / scale).round_dp(2));
        }
    }
    format!("${}", group_thousands(market_cap.round_dp(0), 0))
}

/// Signed percentage, e.g. `+7.52%`
pub fn format_percent(value: Decimal) -> String {
    let sign = if value.is_sign_negative() { "" } else { "+" };
    format!("{sign}{:.2}%", value.round_dp(2))
}

fn group_thousands(value: Decimal, decimals: usize) -> String {
    let formatted = format!("{value:.decimals$}");
    let (sign, unsigned) = formatted
        .strip_prefix('-')
        .map_or(("", formatted.as_str()), |rest| ("-", rest));
    let (int_part, frac_part) = unsigned
        .split_once('.')
        .map_or((unsigned, None), |(i, f)| (i, Some(f)));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::compare;
    use crate::engine::RecommendationEngine;
    use crate::model::{MarketSnapshot, Observation, PriceSeries};

    fn observation(asset_id: &str, rank: u32) -> Observation {
        let start = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        Observation::new(
            MarketSnapshot::new(asset_id)
                .with_rank(rank)
                .with_changes(dec!(1.1), dec!(-2.345), dec!(12))
                .with_market_cap(dec!(1_380_000_000_000)),
            PriceSeries::from_daily_closes(start, &[dec!(100), dec!(105), dec!(98), dec!(112)])
                .unwrap(),
        )
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(dec!(0.000022)), "$0.000022");
        assert_eq!(format_price(dec!(0.5234)), "$0.5234");
        assert_eq!(format_price(dec!(24.5)), "$24.50");
        assert_eq!(format_price(dec!(97500)), "$97,500.00");
        assert_eq!(format_price(dec!(1234567.891)), "$1,234,567.89");
    }

    #[test]
    fn test_format_market_cap() {
        assert_eq!(format_market_cap(dec!(1_380_000_000_000)), "$1.38T");
        assert_eq!(format_market_cap(dec!(19_000_000_000)), "$19.00B");
        assert_eq!(format_market_cap(dec!(5_250_000)), "$5.25M");
        assert_eq!(format_market_cap(dec!(950_000)), "$950,000");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(7.515)), "+7.52%");
        assert_eq!(format_percent(dec!(-2.3)), "-2.30%");
        assert_eq!(format_percent(Decimal::ZERO), "+0.00%");
    }

    #[test]
    fn test_render_recommendation() {
        let engine = RecommendationEngine::default();
        let obs = observation("cardano", 9);
        let result = engine.recommend(&obs.snapshot, &obs.series).unwrap();

        let report = render_recommendation(&result);
        assert!(report.starts_with("CARDANO Analysis"));
        assert!(report.contains("Recommendation:   STRONG BUY"));
        assert!(report.contains("strongly_bullish (+12.00% over 4 samples)"));
        assert!(report.contains("Sustainability:   9/10 (Proof of Stake, 0.0015 kWh per tx)"));
        assert!(report.contains("Market Cap:       $1.38T"));
        assert!(report.contains("  • Top 10 cryptocurrency by market cap"));
    }

    #[test]
    fn test_render_comparison() {
        let engine = RecommendationEngine::default();
        let result = compare::compare(
            &engine,
            &observation("bitcoin", 1),
            &observation("ethereum", 2),
        )
        .unwrap();

        let report = render_comparison(&result);
        assert!(report.starts_with("BITCOIN vs ETHEREUM"));
        assert!(report.contains("Winner: ETHEREUM"));
        assert!(report.contains("Reason: ethereum has a higher recommendation score"));
    }
}
