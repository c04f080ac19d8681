//! HTTP Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crypto_analysis::{
    report, AnalysisError, ComparisonResult, RecommendationResult, SustainabilityEntry,
    TrendResult,
};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub provider_connected: bool,
    pub window_days: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    #[serde(default)]
    pub days: Option<u32>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(err: &AnalysisError) -> ApiError {
    let status = match err {
        AnalysisError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        AnalysisError::InsufficientData { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AnalysisError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AnalysisError::InvalidSeries(_) => StatusCode::BAD_GATEWAY,
        AnalysisError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::warn!("Analysis failed: {}", err);
    } else {
        tracing::debug!("Rejected request: {}", err);
    }

    (
        status,
        Json(ErrorResponse {
            error: err.user_message(),
            code: err.code().into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let client = state.analyst.client();

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider: client.name().to_string(),
        provider_connected: client.health_check().await,
        window_days: state.analyst.window_days(),
    })
}

/// Trend and risk over `?days=N` (default: configured window)
pub async fn analyze_trend(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<TrendResult>, ApiError> {
    let days = query.days.unwrap_or_else(|| state.analyst.window_days());

    state
        .analyst
        .analyze_trend(&asset_id, days)
        .await
        .map(Json)
        .map_err(|e| api_error(&e))
}

/// Scored recommendation for one asset
pub async fn recommend(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> Result<Json<RecommendationResult>, ApiError> {
    state
        .analyst
        .recommend(&asset_id)
        .await
        .map(Json)
        .map_err(|e| api_error(&e))
}

/// Head-to-head comparison
pub async fn compare(
    State(state): State<AppState>,
    Path((left, right)): Path<(String, String)>,
) -> Result<Json<ComparisonResult>, ApiError> {
    state
        .analyst
        .compare(&left, &right)
        .await
        .map(Json)
        .map_err(|e| api_error(&e))
}

/// Sustainability rating (neutral for unknown assets)
pub async fn sustainability(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> Json<SustainabilityEntry> {
    Json(
        state
            .analyst
            .engine()
            .sustainability()
            .lookup(&asset_id)
            .clone(),
    )
}

/// Plain-text recommendation report
pub async fn recommendation_report(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> Result<String, ApiError> {
    state
        .analyst
        .recommend(&asset_id)
        .await
        .map(|result| report::render_recommendation(&result))
        .map_err(|e| api_error(&e))
}
