//! Diversification Scorer
//!
//! 0-100 composite of sector diversity (max 30), share diversity (max 40)
//! and sector concentration (max 30, Herfindahl based).

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

const SECTOR_POINTS: f64 = 30.0;
const SHARE_POINTS: f64 = 40.0;
const CONCENTRATION_POINTS: f64 = 30.0;

/// Sector count earning full sector points
const FULL_SECTOR_COUNT: usize = 10;
/// Company count earning full share points
const FULL_SHARE_COUNT: usize = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AssessmentLevel {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl AssessmentLevel {
    pub fn for_score(overall: u32) -> Self {
        match overall {
            80.. => Self::Excellent,
            60..=79 => Self::Good,
            40..=59 => Self::Fair,
            _ => Self::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Excellent => {
                "Your portfolio is very well-diversified across sectors and holdings with low concentration risk"
            }
            Self::Good => "Your portfolio has reasonable diversification but can be improved",
            Self::Fair => "Your portfolio shows concentration in certain sectors or stocks",
            Self::Poor => {
                "Your portfolio is concentrated with high overlap and limited sector diversity"
            }
        }
    }

    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Excellent => "Maintain current diversification and rebalance periodically",
            Self::Good => "Consider adding 1-2 funds in underrepresented sectors",
            Self::Fair => "Diversify into new sectors and reduce overlap with existing holdings",
            Self::Poor => "Prioritize adding funds in new sectors and replacing overlapping funds",
        }
    }
}

impl fmt::Display for AssessmentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative reading of an overall score
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub level: AssessmentLevel,
    pub description: String,
    pub suggestion: String,
}

impl Assessment {
    pub fn for_score(overall: u32) -> Self {
        let level = AssessmentLevel::for_score(overall);
        Self {
            level,
            description: level.description().to_string(),
            suggestion: level.suggestion().to_string(),
        }
    }
}

/// Composite diversification score.
///
/// Sub-scores are rounded independently of `overall`, so the displayed
/// breakdown may differ from `overall` by one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiversificationScore {
    pub overall: u32,
    pub sector_diversity: u32,
    pub share_diversity: u32,
    pub concentration_score: u32,
    pub assessment: Assessment,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_points(points: f64) -> u32 {
    points.round().clamp(0.0, 100.0) as u32
}

#[allow(clippy::cast_precision_loss)]
fn capped_ratio(count: usize, full: usize) -> f64 {
    count.min(full) as f64 / full as f64
}

impl DiversificationScore {
    /// Score a portfolio from its distinct counts and per-sector fractions
    /// of total investment (each in 0..=1).
    pub fn compute(
        unique_sectors: usize,
        unique_companies: usize,
        sector_fractions: impl IntoIterator<Item = Decimal>,
    ) -> Self {
        let sector = capped_ratio(unique_sectors, FULL_SECTOR_COUNT) * SECTOR_POINTS;
        let share = capped_ratio(unique_companies, FULL_SHARE_COUNT) * SHARE_POINTS;

        let fractions: Vec<f64> = sector_fractions
            .into_iter()
            .map(|fraction| fraction.to_f64().unwrap_or(0.0))
            .collect();

        // nothing held means nothing to be concentrated in
        let concentration = if fractions.is_empty() {
            0.0
        } else {
            let herfindahl: f64 = fractions.iter().map(|f| f * f).sum();
            ((1.0 - herfindahl) * CONCENTRATION_POINTS).max(0.0)
        };

        let overall = round_points(sector + share + concentration);

        Self {
            overall,
            sector_diversity: round_points(sector),
            share_diversity: round_points(share),
            concentration_score: round_points(concentration),
            assessment: Assessment::for_score(overall),
        }
    }

    pub fn level(&self) -> AssessmentLevel {
        self.assessment.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_single_company_portfolio_is_poor() {
        let score = DiversificationScore::compute(1, 1, [dec!(1)]);
        assert_eq!(score.sector_diversity, 3);
        assert_eq!(score.share_diversity, 1);
        assert_eq!(score.concentration_score, 0);
        assert_eq!(score.overall, 4);
        assert_eq!(score.level(), AssessmentLevel::Poor);
    }

    #[test]
    fn test_two_even_sectors_halve_concentration() {
        let score = DiversificationScore::compute(2, 2, [dec!(0.5), dec!(0.5)]);
        // 6 + 2.67 + 15
        assert_eq!(score.concentration_score, 15);
        assert_eq!(score.overall, 24);
    }

    #[test]
    fn test_counts_are_capped() {
        let fractions = vec![dec!(0.1); 10];
        let score = DiversificationScore::compute(20, 60, fractions);
        assert_eq!(score.sector_diversity, 30);
        assert_eq!(score.share_diversity, 40);
        // H = 10 * 0.01 = 0.1
        assert_eq!(score.concentration_score, 27);
        assert_eq!(score.overall, 97);
        assert_eq!(score.level(), AssessmentLevel::Excellent);
    }

    #[test]
    fn test_breakdown_rounding_may_differ_from_overall() {
        // 6 + 2.67 + 12.6 = 21.27, while the parts round to 6 + 3 + 13
        let score = DiversificationScore::compute(2, 2, [dec!(0.7), dec!(0.3)]);
        assert_eq!(score.overall, 21);
        let parts = score.sector_diversity + score.share_diversity + score.concentration_score;
        assert_eq!(parts, 22);
    }

    #[test]
    fn test_no_sectors_scores_zero() {
        let score = DiversificationScore::compute(0, 0, []);
        assert_eq!(score.overall, 0);
        assert_eq!(score.concentration_score, 0);
        assert_eq!(score.level(), AssessmentLevel::Poor);
    }

    #[test]
    fn test_assessment_thresholds() {
        assert_eq!(AssessmentLevel::for_score(80), AssessmentLevel::Excellent);
        assert_eq!(AssessmentLevel::for_score(79), AssessmentLevel::Good);
        assert_eq!(AssessmentLevel::for_score(60), AssessmentLevel::Good);
        assert_eq!(AssessmentLevel::for_score(59), AssessmentLevel::Fair);
        assert_eq!(AssessmentLevel::for_score(40), AssessmentLevel::Fair);
        assert_eq!(AssessmentLevel::for_score(39), AssessmentLevel::Poor);
        assert_eq!(
            Assessment::for_score(65).suggestion,
            "Consider adding 1-2 funds in underrepresented sectors"
        );
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(DiversificationScore::compute(1, 1, [dec!(1)])).unwrap();
        assert_eq!(json["sectorDiversity"], 3);
        assert_eq!(json["assessment"]["level"], "Poor");
    }
}
