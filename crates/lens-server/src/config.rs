//! Server Configuration
//!
//! Everything is read from the environment (after `.env` is loaded).
//! Missing collaborator credentials are not an error: the server then runs
//! with the offline narrative formatter.

use std::fmt;
use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Which collaborator phrases the narratives
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NarrativeBackend {
    Gemini,
    Ollama,
    None,
}

impl NarrativeBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            NarrativeBackend::Gemini => "gemini",
            NarrativeBackend::Ollama => "ollama",
            NarrativeBackend::None => "none",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini" => Some(NarrativeBackend::Gemini),
            "ollama" => Some(NarrativeBackend::Ollama),
            "none" | "off" | "fallback" => Some(NarrativeBackend::None),
            _ => None,
        }
    }
}

impl fmt::Display for NarrativeBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub backend: NarrativeBackend,

    /// Bound on one collaborator call
    pub narrative_timeout: Duration,

    pub temperature: f32,

    /// Reject funds the holdings catalog does not list
    pub strict_holdings: bool,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let has_gemini_key = lookup("GEMINI_API_KEY").is_some_and(|k| !k.trim().is_empty());

        let backend = match lookup("NARRATIVE_BACKEND") {
            Some(value) => NarrativeBackend::parse(&value).unwrap_or_else(|| {
                tracing::warn!(value = %value, "unknown NARRATIVE_BACKEND, narratives disabled");
                NarrativeBackend::None
            }),
            None if has_gemini_key => NarrativeBackend::Gemini,
            None => NarrativeBackend::None,
        };

        let narrative_timeout = lookup("NARRATIVE_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            backend,
            narrative_timeout: Duration::from_secs(narrative_timeout),
            temperature: lookup("NARRATIVE_TEMPERATURE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TEMPERATURE),
            strict_holdings: lookup("HOLDINGS_STRICT").is_some_and(|v| {
                matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
            }),
        }
    }
}
