//! # lens-core
//!
//! Provider-agnostic abstraction over the generative-text collaborator that
//! phrases portfolio analyses as investor-facing narratives.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     NarrativeFormatter                        │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐   │
//! │  │   Prompt     │──▶│ LlmProvider  │──▶│  JSON response   │   │
//! │  │   builder    │   │  (Strategy)  │   │  or fallback     │   │
//! │  └──────────────┘   └──────────────┘   └──────────────────┘   │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait enables swapping between Gemini, Ollama, or any
//! other backend without touching the analysis engine.

pub mod provider;
pub mod message;
pub mod error;

pub use error::{CollaboratorError, Result};
pub use message::{Message, Role};
pub use provider::{Completion, GenerationOptions, LlmProvider};
