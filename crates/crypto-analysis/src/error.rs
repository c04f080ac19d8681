//! Error Types for Crypto Analysis

use thiserror::Error;

use crate::market::FetchError;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Fewer than two price samples in the window
    #[error("Insufficient data: {samples} price sample(s), need at least 2")]
    InsufficientData { samples: usize },

    /// Snapshot incomplete, series unusable, or the data layer failed
    #[error("Analysis unavailable for {asset_id}: {reason}")]
    Unavailable { asset_id: String, reason: String },

    #[error("Invalid price series: {0}")]
    InvalidSeries(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AnalysisError {
    pub fn unavailable(asset_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            asset_id: asset_id.into(),
            reason: reason.into(),
        }
    }

    /// Wrap a data-layer failure. The core never inspects it beyond its message.
    pub fn from_fetch(asset_id: impl Into<String>, err: &FetchError) -> Self {
        Self::unavailable(asset_id, err.to_string())
    }

    /// Short machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::InsufficientData { .. } => "INSUFFICIENT_DATA",
            Self::Unavailable { .. } => "UNAVAILABLE",
            Self::InvalidSeries(_) => "INVALID_SERIES",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::InsufficientData { .. } => {
                "Not enough price history to analyze this asset.".into()
            }
            Self::Unavailable { asset_id, .. } => {
                format!("Unable to analyze {asset_id} right now - market data is incomplete or unavailable.")
            }
            Self::InvalidSeries(_) => "The market data provider returned unusable price data.".into(),
            Self::InvalidInput(msg) => format!("Invalid request: {msg}"),
            Self::Config(_) => "The analysis service is misconfigured.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_errors_become_unavailable() {
        let err = AnalysisError::from_fetch("dogecoin", &FetchError::RateLimited);
        assert_eq!(err.code(), "UNAVAILABLE");
        match err {
            AnalysisError::Unavailable { asset_id, reason } => {
                assert_eq!(asset_id, "dogecoin");
                assert!(reason.contains("rate limited"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
