//! Router

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{
    analyze, detailed_analysis, fund_holdings, health_check, insights, list_models,
};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health & info
        .route("/api/health", get(health_check))
        .route("/api/models", get(list_models))

        // Holdings
        .route("/api/funds/holdings", post(fund_holdings))

        // Analysis
        .route("/api/portfolio/analyze", post(analyze))
        .route("/api/portfolio/detailed-analysis", post(detailed_analysis))

        // Narratives
        .route("/api/ai/insights", post(insights))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
