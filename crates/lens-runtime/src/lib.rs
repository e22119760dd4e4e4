//! # lens-runtime
//!
//! Concrete generative-text collaborators for FundLens narratives.
//!
//! ## Providers
//!
//! - **Gemini** (default): Google generative-language REST API
//! - **Ollama** (feature `ollama`): local inference via Ollama
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lens_runtime::gemini::{GeminiConfig, GeminiProvider};
//!
//! let provider = GeminiProvider::from_config(GeminiConfig::from_env()?)?;
//! let formatter = NarrativeFormatter::new(Arc::new(provider), options);
//! ```

pub mod gemini;

#[cfg(feature = "ollama")]
pub mod ollama;

pub use gemini::{GeminiConfig, GeminiProvider};

#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaProvider};

// Re-export core types for convenience
pub use lens_core::{CollaboratorError, GenerationOptions, LlmProvider, Message, Result, Role};
