//! HTTP Handlers

use axum::{Json, extract::State, http::StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fund_analyzer::{
    AnalyzerError, BasicAnalysis, DetailedAnalysis, FundHolding, InsightRequest, Insights,
    OnboardingAnswers, RiskProfile, analyze_portfolio, analyze_portfolio_detailed,
    analysis::{CompanyShare, SectorSlice},
    engine::Warning,
};
use lens_core::provider::ModelInfo;

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub narrative_backend: &'static str,
    pub collaborator_available: bool,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelsResponse {
    /// Display name of the collaborator, absent when offline
    pub provider: Option<String>,
    pub models: Vec<ModelInfo>,
    pub supports_json_mode: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Deserialize)]
pub struct FundLookupRequest {
    pub name: String,
    pub amount: Decimal,
}

/// Funds plus the investor's profile name (lenient: unknown → Balanced).
///
/// A fund sent without holdings is resolved through the holdings source.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortfolioRequest {
    pub funds: Vec<FundHolding>,
    pub risk_profile: Option<String>,
}

impl PortfolioRequest {
    fn profile(&self) -> RiskProfile {
        self.risk_profile
            .as_deref()
            .map(RiskProfile::parse_or_default)
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "userType", rename_all = "lowercase")]
pub enum InsightsRequest {
    New {
        #[serde(default)]
        answers: OnboardingAnswers,
    },
    Existing {
        #[serde(flatten)]
        portfolio: PortfolioRequest,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicSummary {
    pub sector_distribution: Vec<SectorSlice>,
    pub company_exposure: Vec<CompanyShare>,
    pub warnings: Vec<Warning>,
}

impl From<BasicAnalysis> for BasicSummary {
    fn from(basic: BasicAnalysis) -> Self {
        Self {
            sector_distribution: basic.sector_distribution,
            company_exposure: basic.company_exposure,
            warnings: basic.warnings,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedResponse {
    #[serde(flatten)]
    pub analysis: DetailedAnalysis,
    pub risk_profile: RiskProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_analysis: Option<BasicSummary>,
}

// ============================================================================
// Error Mapping
// ============================================================================

fn error_response(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

fn analyzer_error(e: &AnalyzerError) -> ApiError {
    match e {
        AnalyzerError::UnknownFund(_) => error_response(StatusCode::NOT_FOUND, e.to_string(), "UNKNOWN_FUND"),
        _ if e.is_invalid_input() => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string(), "INVALID_INPUT")
        }
        _ => error_response(StatusCode::BAD_REQUEST, e.to_string(), "BAD_REQUEST"),
    }
}

/// Fill in holdings for funds that arrived without any
async fn resolve_funds(
    state: &AppState,
    funds: Vec<FundHolding>,
) -> Result<Vec<FundHolding>, AnalyzerError> {
    let mut resolved = Vec::with_capacity(funds.len());
    for fund in funds {
        if fund.holdings.is_empty() {
            resolved.push(FundHolding::from_source(&fund.name, fund.amount, state.holdings.as_ref()).await?);
        } else {
            resolved.push(fund);
        }
    }
    Ok(resolved)
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let collaborator_available = match state.formatter.provider() {
        Some(provider) => {
            let check = lens_core::provider::is_available(provider.as_ref());
            tokio::time::timeout(state.status_timeout, check)
                .await
                .unwrap_or_else(|_| {
                    tracing::warn!(provider = provider.name(), "health check timed out");
                    false
                })
        }
        None => false,
    };

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        narrative_backend: state.backend.as_str(),
        collaborator_available,
    })
}

/// Collaborator name, capabilities and models; empty when offline
pub async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    let Some(provider) = state.formatter.provider() else {
        return Json(ModelsResponse::default());
    };

    match tokio::time::timeout(state.status_timeout, provider.info()).await {
        Ok(Ok(info)) => Json(ModelsResponse {
            provider: Some(info.name),
            models: info.models,
            supports_json_mode: info.supports_json_mode,
        }),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "could not describe collaborator");
            Json(ModelsResponse {
                provider: Some(provider.name().to_string()),
                ..ModelsResponse::default()
            })
        }
        Err(_) => {
            tracing::warn!(provider = provider.name(), "collaborator info timed out");
            Json(ModelsResponse {
                provider: Some(provider.name().to_string()),
                ..ModelsResponse::default()
            })
        }
    }
}

/// Resolve one fund's top holdings
pub async fn fund_holdings(
    State(state): State<AppState>,
    Json(payload): Json<FundLookupRequest>,
) -> ApiResult<FundHolding> {
    FundHolding::from_source(&payload.name, payload.amount, state.holdings.as_ref())
        .await
        .map(Json)
        .map_err(|e| analyzer_error(&e))
}

/// Sector, company and overlap view with risk warnings
pub async fn analyze(
    State(state): State<AppState>,
    Json(payload): Json<PortfolioRequest>,
) -> ApiResult<BasicAnalysis> {
    let profile = payload.profile();
    let funds = resolve_funds(&state, payload.funds)
        .await
        .map_err(|e| analyzer_error(&e))?;

    analyze_portfolio(&funds, profile)
        .map(Json)
        .map_err(|e| analyzer_error(&e))
}

/// Overlap, diversification score and sector gaps
pub async fn detailed_analysis(
    State(state): State<AppState>,
    Json(payload): Json<PortfolioRequest>,
) -> ApiResult<DetailedResponse> {
    let profile = payload.profile();
    let funds = resolve_funds(&state, payload.funds)
        .await
        .map_err(|e| analyzer_error(&e))?;

    let analysis = analyze_portfolio_detailed(&funds).map_err(|e| analyzer_error(&e))?;
    let basic_analysis = if analysis.score().is_some() {
        Some(
            analyze_portfolio(&funds, profile)
                .map_err(|e| analyzer_error(&e))?
                .into(),
        )
    } else {
        None
    };

    Ok(Json(DetailedResponse {
        analysis,
        risk_profile: profile,
        basic_analysis,
    }))
}

/// Narrative for a new or existing investor; falls back when the collaborator fails
pub async fn insights(
    State(state): State<AppState>,
    Json(payload): Json<InsightsRequest>,
) -> ApiResult<Insights> {
    let insights = match payload {
        InsightsRequest::New { answers } => {
            state.formatter.generate(&InsightRequest::NewInvestor(&answers)).await
        }
        InsightsRequest::Existing { portfolio } => {
            if portfolio.funds.is_empty() {
                return Err(error_response(
                    StatusCode::BAD_REQUEST,
                    "No funds found for analysis",
                    "NO_FUNDS",
                ));
            }

            let profile = portfolio.profile();
            let funds = resolve_funds(&state, portfolio.funds)
                .await
                .map_err(|e| analyzer_error(&e))?;
            let basic = analyze_portfolio(&funds, profile).map_err(|e| analyzer_error(&e))?;
            let detailed = analyze_portfolio_detailed(&funds).map_err(|e| analyzer_error(&e))?;

            let request = InsightRequest::ExistingInvestor {
                portfolio: &basic,
                analysis: &detailed,
            };
            state.formatter.generate(&request).await
        }
    };

    tracing::info!(source = ?insights.source(), "insights generated");
    Ok(Json(insights))
}
