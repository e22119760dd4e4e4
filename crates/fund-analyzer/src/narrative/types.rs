//! Narrative request and response types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analysis::{BasicAnalysis, DetailedAnalysis};
use crate::model::{InvestmentHorizon, RiskAppetite, RiskProfile};

/// Where an [`Insights`] value came from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightSource {
    #[default]
    Model,
    Fallback,
}

/// A number typed into a form field, or the raw text when it was sent as a string
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormAmount {
    Number(Decimal),
    Text(String),
}

impl FormAmount {
    /// Positive amount, ignoring currency symbols and separators
    pub fn positive(&self) -> Option<Decimal> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(text) => {
                let digits: String = text
                    .chars()
                    .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                    .collect();
                digits.parse::<Decimal>().ok()?
            }
        };
        (value > Decimal::ZERO).then_some(value)
    }
}

/// Onboarding questionnaire of a first-time investor; every answer is optional
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OnboardingAnswers {
    pub has_insurance: Option<String>,
    pub has_emergency_fund: Option<String>,
    pub monthly_investment: Option<FormAmount>,
    pub risk_appetite: Option<String>,
    pub investment_horizon: Option<String>,
}

fn answer_is(answer: Option<&String>, expected: &str) -> bool {
    answer.is_some_and(|a| a.trim().eq_ignore_ascii_case(expected))
}

impl OnboardingAnswers {
    /// Anything but an explicit "no" counts as insured
    pub fn insured(&self) -> bool {
        !answer_is(self.has_insurance.as_ref(), "no")
    }

    /// Only an explicit "yes" counts as having an emergency fund
    pub fn has_emergency_fund(&self) -> bool {
        answer_is(self.has_emergency_fund.as_ref(), "yes")
    }

    pub fn monthly_capacity(&self) -> Option<Decimal> {
        self.monthly_investment.as_ref().and_then(FormAmount::positive)
    }

    pub fn appetite(&self) -> Option<RiskAppetite> {
        self.risk_appetite.as_deref().and_then(RiskAppetite::parse)
    }

    pub fn horizon(&self) -> Option<InvestmentHorizon> {
        self.investment_horizon.as_deref().and_then(InvestmentHorizon::parse)
    }

    /// Risk profile implied by the answers (Balanced when unanswered)
    pub fn risk_profile(&self) -> RiskProfile {
        match (self.horizon(), self.appetite()) {
            (Some(horizon), Some(appetite)) => RiskProfile::from_onboarding(horizon, appetite),
            _ => RiskProfile::default(),
        }
    }
}

/// What the narrative is about
#[derive(Clone, Copy, Debug)]
pub enum InsightRequest<'a> {
    NewInvestor(&'a OnboardingAnswers),
    ExistingInvestor {
        portfolio: &'a BasicAnalysis,
        analysis: &'a DetailedAnalysis,
    },
}

impl InsightRequest<'_> {
    pub fn kind(&self) -> InsightKind {
        match self {
            Self::NewInvestor(_) => InsightKind::NewInvestor,
            Self::ExistingInvestor { .. } => InsightKind::ExistingInvestor,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsightKind {
    NewInvestor,
    ExistingInvestor,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskWarning {
    pub title: String,
    pub message: String,
}

impl RiskWarning {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapDetail {
    pub company: String,
    pub number_of_funds: usize,
    #[serde(default)]
    pub funds: Vec<String>,
    pub total_exposure_percent: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorDetail {
    pub sector: String,
    pub number_of_funds: usize,
    #[serde(default)]
    pub funds: Vec<String>,
    pub total_exposure_percent: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDetail {
    pub overall: u32,
    pub level: String,
    pub sector_diversity: u32,
    pub share_diversity: u32,
    pub concentration_score: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorSuggestion {
    pub sector: String,
    pub reason: String,
    #[serde(default)]
    pub expected_characteristics: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundSuggestion {
    pub sector: String,
    pub fund_type: String,
    pub recommendation: String,
    pub rationale: String,
}

/// Narrative for an investor who already holds funds.
///
/// The basic prompt only asks for the five always-present fields; the
/// detailed prompt and the fallback fill the rest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioInsights {
    pub portfolio_health: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlapping_holdings: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlapping_shares_detail: Option<Vec<OverlapDetail>>,

    pub sector_congestion: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlapping_sectors_detail: Option<Vec<SectorDetail>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diversification_assessment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diversification_score_detail: Option<ScoreDetail>,

    pub risk_warnings: Vec<RiskWarning>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potential_sectors: Option<Vec<SectorSuggestion>>,

    pub suggested_adjustments: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fund_recommendations: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fund_recommendations_detail: Option<Vec<FundSuggestion>>,

    pub risk_alignment: String,

    #[serde(rename = "_source", default)]
    pub source: InsightSource,
}

/// Narrative for a first-time investor
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessInsights {
    pub financial_readiness: String,
    pub priority_checklist: Vec<String>,
    pub investment_guidance: String,
    pub next_steps: String,

    #[serde(rename = "_source", default)]
    pub source: InsightSource,
}

/// Investor-facing narrative, always schema-complete whatever its source
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Insights {
    Portfolio(PortfolioInsights),
    Readiness(ReadinessInsights),
}

impl Insights {
    pub fn source(&self) -> InsightSource {
        match self {
            Self::Portfolio(p) => p.source,
            Self::Readiness(r) => r.source,
        }
    }
}
