//! Trend Analyzer
//!
//! Classifies a price series by net change and average absolute
//! day-over-day swing:
//!
//! ```text
//!   change %   > 10  strongly_bullish      volatility  > 15  very_high
//!              > 3   bullish                           > 10  high
//!              > -3  sideways                          > 5   medium
//!              > -10 bearish                           else  low
//!              else  strongly_bearish
//! ```
//!
//! Classification uses exact values; only the reported figures are rounded.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{AnalysisError, Result};
use crate::ladder::{Bound, Ladder};
use crate::model::{PriceSeries, RiskLevel, Trend, TrendResult};

/// Decimal places kept in reported figures
pub const DISPLAY_PRECISION: u32 = 2;

const TREND_RUNGS: &[(Bound<Decimal>, Trend)] = &[
    (Bound::Above(dec!(10)), Trend::StronglyBullish),
    (Bound::Above(dec!(3)), Trend::Bullish),
    (Bound::Above(dec!(-3)), Trend::Sideways),
    (Bound::Above(dec!(-10)), Trend::Bearish),
];

pub const TREND_LADDER: Ladder<Decimal, Trend> = Ladder::new(TREND_RUNGS, Trend::StronglyBearish);

const RISK_RUNGS: &[(Bound<Decimal>, RiskLevel)] = &[
    (Bound::Above(dec!(15)), RiskLevel::VeryHigh),
    (Bound::Above(dec!(10)), RiskLevel::High),
    (Bound::Above(dec!(5)), RiskLevel::Medium),
];

pub const RISK_LADDER: Ladder<Decimal, RiskLevel> = Ladder::new(RISK_RUNGS, RiskLevel::Low);

/// Analyze a series of at least two samples
pub fn analyze(series: &PriceSeries) -> Result<TrendResult> {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return Err(AnalysisError::InsufficientData { samples: series.len() });
    };
    if series.len() < 2 {
        return Err(AnalysisError::InsufficientData { samples: series.len() });
    }

    let change_percent = percent_change(first.price, last.price)?;
    let volatility = mean_abs_swing(series)?;

    let trend = TREND_LADDER.classify(&change_percent);
    let risk_level = RISK_LADDER.classify(&volatility);

    tracing::debug!(
        samples = series.len(),
        %change_percent,
        %volatility,
        %trend,
        %risk_level,
        "Classified price series"
    );

    Ok(TrendResult {
        trend,
        change_percent: round(change_percent),
        volatility: round(volatility),
        risk_level,
        start_price: round(first.price),
        end_price: round(last.price),
        samples: series.len(),
    })
}

/// `(to - from) / from * 100`
fn percent_change(from: Decimal, to: Decimal) -> Result<Decimal> {
    to.checked_sub(from)
        .and_then(|delta| delta.checked_div(from))
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .ok_or_else(|| {
            AnalysisError::InvalidSeries(format!("percentage change from {from} to {to} overflows"))
        })
}

/// Mean of absolute percent changes between consecutive samples
fn mean_abs_swing(series: &PriceSeries) -> Result<Decimal> {
    let pairs = series.points().windows(2);
    let count = pairs.len();
    if count == 0 {
        return Ok(Decimal::ZERO);
    }

    let mut total = Decimal::ZERO;
    for pair in pairs {
        let swing = percent_change(pair[0].price, pair[1].price)?.abs();
        total = total.checked_add(swing).ok_or_else(|| {
            AnalysisError::InvalidSeries("volatility sum overflows".into())
        })?;
    }

    Ok(total / Decimal::from(count))
}

fn round(value: Decimal) -> Decimal {
    value.round_dp(DISPLAY_PRECISION)
}
