//! Response parsing
//!
//! Models often wrap JSON in markdown fences; those are stripped before
//! deserializing. Anything else that is not the expected shape is a
//! parse error.

use lens_core::CollaboratorError;

use super::types::{InsightKind, InsightSource, Insights, PortfolioInsights, ReadinessInsights};

/// Longest slice of the raw reply quoted in parse errors
const EXCERPT_LEN: usize = 200;

fn strip_fences(raw: &str) -> &str {
    raw.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

fn excerpt(raw: &str) -> &str {
    match raw.char_indices().nth(EXCERPT_LEN) {
        Some((end, _)) => &raw[..end],
        None => raw,
    }
}

/// Parse a collaborator reply into the narrative shape `kind` expects
pub fn parse_insights(kind: InsightKind, raw: &str) -> Result<Insights, CollaboratorError> {
    let cleaned = strip_fences(raw);
    let parse_error =
        |e: serde_json::Error| CollaboratorError::Parse(format!("{e}. Raw: {}", excerpt(raw)));

    let insights = match kind {
        InsightKind::ExistingInvestor => {
            let mut parsed: PortfolioInsights = serde_json::from_str(cleaned).map_err(parse_error)?;
            parsed.source = InsightSource::Model;
            Insights::Portfolio(parsed)
        }
        InsightKind::NewInvestor => {
            let mut parsed: ReadinessInsights = serde_json::from_str(cleaned).map_err(parse_error)?;
            parsed.source = InsightSource::Model;
            Insights::Readiness(parsed)
        }
    };

    Ok(insights)
}
