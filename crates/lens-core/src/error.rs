//! Error Types

use std::time::Duration;

use thiserror::Error;

/// Result type alias for collaborator operations
pub type Result<T> = std::result::Result<T, CollaboratorError>;

/// Failures of the generative-text collaborator.
///
/// None of these reach an end user directly: the narrative boundary maps
/// every variant to the deterministic fallback.
#[derive(Error, Debug)]
pub enum CollaboratorError {
    /// Provider returned an error
    #[error("Provider error: {0}")]
    Provider(String),
    
    /// Provider unavailable or not responding
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),
    
    /// No provider configured (missing credentials, backend disabled)
    #[error("No narrative provider configured")]
    NotConfigured,
    
    /// Provider did not answer within the caller's bound
    #[error("Provider timed out after {0:?}")]
    Timeout(Duration),
    
    /// Response could not be turned into the expected structure
    #[error("Parse error: {0}")]
    Parse(String),
    
    /// Rate limited
    #[error("Rate limited: {0}")]
    RateLimited(String),
    
    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Auth(String),
    
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
    
    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            CollaboratorError::Timeout(Duration::from_secs(5)).to_string(),
            "Provider timed out after 5s"
        );
        assert_eq!(
            CollaboratorError::NotConfigured.to_string(),
            "No narrative provider configured"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let err: CollaboratorError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert!(matches!(err, CollaboratorError::Json(_)));
    }
}
