//! Application State

use std::sync::Arc;
use std::time::Duration;

use fund_analyzer::{CatalogHoldingsSource, HoldingsSource, NarrativeFormatter};
use lens_core::{GenerationOptions, LlmProvider};
use lens_runtime::{GeminiProvider, OllamaProvider};

use crate::config::{NarrativeBackend, ServerConfig};

/// Bound on the health and model-listing calls to the collaborator
const STATUS_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Narrative formatter (offline when no collaborator is configured)
    pub formatter: NarrativeFormatter,

    /// Where fund holdings are resolved
    pub holdings: Arc<dyn HoldingsSource>,

    pub backend: NarrativeBackend,

    pub status_timeout: Duration,
}

impl AppState {
    /// State with no collaborator and the catalog holdings source
    pub fn offline() -> Self {
        Self {
            formatter: NarrativeFormatter::offline(),
            holdings: Arc::new(CatalogHoldingsSource::new()),
            backend: NarrativeBackend::None,
            status_timeout: STATUS_TIMEOUT,
        }
    }

    /// Wire the configured collaborator into the formatter.
    ///
    /// A collaborator that cannot be constructed downgrades to offline.
    pub fn from_config(config: &ServerConfig) -> Self {
        let options = GenerationOptions::default().with_temperature(config.temperature);

        let collaborator: Option<(Arc<dyn LlmProvider>, GenerationOptions)> = match config.backend {
            NarrativeBackend::Gemini => match GeminiProvider::from_env() {
                Ok(provider) => {
                    let model = provider.config().model.clone();
                    Some((Arc::new(provider) as Arc<dyn LlmProvider>, options.with_model(model)))
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Gemini not configured, narratives use the fallback");
                    None
                }
            },
            NarrativeBackend::Ollama => {
                let provider = OllamaProvider::from_env();
                let model = provider.config().model.clone();
                Some((Arc::new(provider) as Arc<dyn LlmProvider>, options.with_model(model)))
            }
            NarrativeBackend::None => None,
        };

        let holdings: Arc<dyn HoldingsSource> = if config.strict_holdings {
            Arc::new(CatalogHoldingsSource::strict())
        } else {
            Arc::new(CatalogHoldingsSource::new())
        };

        let Some((provider, options)) = collaborator else {
            return Self {
                holdings,
                ..Self::offline()
            };
        };

        tracing::info!(provider = provider.name(), model = %options.model, "narrative collaborator selected");

        Self {
            formatter: NarrativeFormatter::new(provider, options).with_timeout(config.narrative_timeout),
            holdings,
            backend: config.backend,
            status_timeout: STATUS_TIMEOUT,
        }
    }
}
