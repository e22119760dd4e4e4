//! Narrative Formatter
//!
//! Boundary to the generative-text collaborator. The collaborator call is an
//! explicit `Result<Insights, CollaboratorError>` ([`NarrativeFormatter::request_narrative`]);
//! [`NarrativeFormatter::generate`] maps every error to the deterministic
//! fallback, so callers always get a schema-complete narrative.

mod fallback;
mod prompt;
mod response;
mod text;
mod types;

pub use fallback::fallback_insights;
pub use prompt::build_prompt;
pub use response::parse_insights;
pub use text::rupees;
pub use types::{
    FormAmount, FundSuggestion, InsightKind, InsightRequest, InsightSource, Insights,
    OnboardingAnswers, OverlapDetail, PortfolioInsights, ReadinessInsights, RiskWarning,
    ScoreDetail, SectorDetail, SectorSuggestion,
};

use std::sync::Arc;
use std::time::Duration;

use lens_core::{CollaboratorError, GenerationOptions, LlmProvider, Message};

use crate::FUND_ADVISOR_PROMPT;

/// Default bound on one collaborator call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Produces investor narratives, through a collaborator when one is configured
#[derive(Clone)]
pub struct NarrativeFormatter {
    provider: Option<Arc<dyn LlmProvider>>,
    options: GenerationOptions,
    timeout: Duration,
}

impl std::fmt::Debug for NarrativeFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrativeFormatter")
            .field("provider", &self.provider_name())
            .field("model", &self.options.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl NarrativeFormatter {
    pub fn new(provider: Arc<dyn LlmProvider>, options: GenerationOptions) -> Self {
        Self {
            provider: Some(provider),
            options,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Formatter with no collaborator: every narrative is the fallback
    pub fn offline() -> Self {
        Self {
            provider: None,
            options: GenerationOptions::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider(&self) -> Option<&Arc<dyn LlmProvider>> {
        self.provider.as_ref()
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.name())
    }

    /// Ask the collaborator for a narrative, bounded by the formatter's timeout
    pub async fn request_narrative(
        &self,
        request: &InsightRequest<'_>,
    ) -> Result<Insights, CollaboratorError> {
        let provider = self.provider.as_ref().ok_or(CollaboratorError::NotConfigured)?;

        let messages = [
            Message::system(FUND_ADVISOR_PROMPT),
            Message::user(build_prompt(request)),
        ];

        let completion = tokio::time::timeout(self.timeout, provider.complete(&messages, &self.options))
            .await
            .map_err(|_| CollaboratorError::Timeout(self.timeout))??;

        if completion.truncated() {
            tracing::debug!(model = %completion.model, "narrative reply hit the token limit");
        }

        parse_insights(request.kind(), &completion.content)
    }

    /// Narrative for `request`; never fails
    pub async fn generate(&self, request: &InsightRequest<'_>) -> Insights {
        match self.request_narrative(request).await {
            Ok(insights) => insights,
            Err(CollaboratorError::NotConfigured) => fallback_insights(request),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    provider = self.provider_name().unwrap_or("none"),
                    "collaborator failed, using fallback narrative"
                );
                fallback_insights(request)
            }
        }
    }
}
