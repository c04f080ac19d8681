//! crypto-analysis HTTP Server
//!
//! Axum-based server exposing trend analysis, recommendations, and
//! head-to-head comparisons over REST.

mod handlers;
mod state;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crypto_analysis::AnalysisConfig;

use crate::handlers::{
    analyze_trend, compare, health_check, recommend, recommendation_report, sustainability,
};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = AnalysisConfig::from_env()?;
    let analyst = config.build_analyst()?;

    // Verify market data provider
    let client = analyst.client();
    if client.health_check().await {
        tracing::info!("✓ Connected to {}", client.name());
    } else {
        tracing::warn!("⚠ {} not reachable - requests will fail", client.name());
        tracing::warn!("  Set MARKET_DATA_PROVIDER=mock to run offline");
    }

    let ratings = analyst.engine().sustainability();
    tracing::info!(
        "Loaded {} sustainability ratings, trend window {} days",
        ratings.len(),
        analyst.window_days()
    );

    let app = build_router(AppState::new(analyst));

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 crypto-analysis server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                      - Health check");
    tracing::info!("  GET  /api/trend/{{asset}}?days=N    - Trend and risk");
    tracing::info!("  GET  /api/recommend/{{asset}}       - Recommendation");
    tracing::info!("  GET  /api/compare/{{a}}/{{b}}         - Compare two assets");
    tracing::info!("  GET  /api/sustainability/{{asset}}  - Sustainability rating");
    tracing::info!("  GET  /api/report/{{asset}}          - Plain-text report");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health & info
        .route("/health", get(health_check))
        // Analysis API
        .route("/api/trend/{asset}", get(analyze_trend))
        .route("/api/recommend/{asset}", get(recommend))
        .route("/api/compare/{left}/{right}", get(compare))
        .route("/api/sustainability/{asset}", get(sustainability))
        .route("/api/report/{asset}", get(recommendation_report))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
