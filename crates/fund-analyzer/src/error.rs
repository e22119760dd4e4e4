//! Error Types for the Fund Analyzer

use rust_decimal::Decimal;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Invalid fund '{fund}': {reason}")]
    InvalidFund {
        fund: String,
        reason: String,
    },
    
    #[error("Invalid holding {company:?} in fund '{fund}': {reason}")]
    InvalidHolding {
        fund: String,
        company: String,
        reason: String,
    },
    
    #[error("Weight {weight} of {company:?} in fund '{fund}' is outside 0-100")]
    WeightOutOfRange {
        fund: String,
        company: String,
        weight: Decimal,
    },
    
    #[error("Unknown risk profile: {0}")]
    InvalidRiskProfile(String),
    
    #[error("No holdings known for fund '{0}'")]
    UnknownFund(String),
}

impl AnalyzerError {
    /// Whether the error was caused by the caller's input rather than the engine
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            AnalyzerError::InvalidFund { .. }
                | AnalyzerError::InvalidHolding { .. }
                | AnalyzerError::WeightOutOfRange { .. }
                | AnalyzerError::InvalidRiskProfile(_)
        )
    }
}
