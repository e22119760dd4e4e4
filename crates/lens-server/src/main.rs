//! FundLens HTTP Server
//!
//! Axum-based server exposing the portfolio analysis engine and the
//! investor narratives as JSON endpoints.

mod config;
mod handlers;
mod routes;
mod state;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fund_analyzer::CATALOG_FUNDS;

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    let state = AppState::from_config(&config);

    // Verify the collaborator without blocking startup
    match state.formatter.provider() {
        Some(provider) => {
            let check = lens_core::provider::is_available(provider.as_ref());
            if tokio::time::timeout(state.status_timeout, check).await.unwrap_or(false) {
                tracing::info!("✓ Connected to {}", provider.name());
            } else {
                tracing::warn!("⚠ {} not reachable - narratives will use the fallback", provider.name());
            }
        }
        None => {
            tracing::warn!("⚠ No narrative collaborator configured - fallback narratives only");
            tracing::warn!("  Set GEMINI_API_KEY or NARRATIVE_BACKEND=ollama in .env");
        }
    }

    tracing::info!("Holdings catalog: {} funds", CATALOG_FUNDS.len());
    for fund in CATALOG_FUNDS {
        tracing::info!("  • {}", fund);
    }

    let app = routes::router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 FundLens server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /api/health                     - Health check");
    tracing::info!("  GET  /api/models                     - Collaborator models");
    tracing::info!("  POST /api/funds/holdings             - Resolve fund holdings");
    tracing::info!("  POST /api/portfolio/analyze          - Exposure and warnings");
    tracing::info!("  POST /api/portfolio/detailed-analysis - Overlap and diversification");
    tracing::info!("  POST /api/ai/insights                - Investor narrative");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
