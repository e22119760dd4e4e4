//! Domain Models
//!
//! Fund holding snapshots and the investor attributes the engine reads.
//! Uses `rust_decimal` for all monetary values and weights - never use f64 for money!

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{AnalyzerError, Result};

/// A single company position inside one fund
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    /// Company name (free text, matched literally across funds)
    pub company: String,

    /// Sector label as supplied by the holdings feed
    pub sector: String,

    /// Percentage of the fund's assets, 0-100
    #[serde(alias = "weightPercent")]
    pub weight: Decimal,
}

impl Holding {
    pub fn new(company: impl Into<String>, sector: impl Into<String>, weight: Decimal) -> Self {
        Self {
            company: company.into(),
            sector: sector.into(),
            weight,
        }
    }
}

/// One fund held by the investor, with its invested amount and top holdings.
///
/// Weights need not sum to 100: holdings lists are usually the top-N only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundHolding {
    /// Fund name, unique within one portfolio
    #[serde(alias = "fundName")]
    pub name: String,

    /// Invested amount in rupees
    #[serde(alias = "investedAmount")]
    pub amount: Decimal,

    /// Holdings in feed order
    #[serde(default)]
    pub holdings: Vec<Holding>,
}

impl FundHolding {
    pub fn new(name: impl Into<String>, amount: Decimal, holdings: Vec<Holding>) -> Self {
        Self {
            name: name.into(),
            amount,
            holdings,
        }
    }

    /// Absolute rupee exposure of one holding of this fund
    pub fn exposure_of(&self, holding: &Holding) -> Result<Decimal> {
        (holding.weight / dec!(100))
            .checked_mul(self.amount)
            .ok_or_else(|| self.out_of_range())
    }

    /// Combined invested amount of `funds`
    pub fn total_of(funds: &[FundHolding]) -> Result<Decimal> {
        funds.iter().try_fold(Decimal::ZERO, |total, fund| {
            total.checked_add(fund.amount).ok_or_else(|| fund.out_of_range())
        })
    }

    /// Error for a fund whose amounts no longer fit a `Decimal`
    pub(crate) fn out_of_range(&self) -> AnalyzerError {
        AnalyzerError::InvalidFund {
            fund: self.name.clone(),
            reason: "amount out of range".into(),
        }
    }

    /// Reject records the engine cannot account for.
    ///
    /// A bad holding is an error, never skipped: dropping it would skew
    /// every exposure percentage without a trace.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AnalyzerError::InvalidFund {
                fund: self.name.clone(),
                reason: "fund name is empty".into(),
            });
        }

        if self.amount < Decimal::ZERO {
            return Err(AnalyzerError::InvalidFund {
                fund: self.name.clone(),
                reason: format!("invested amount {} is negative", self.amount),
            });
        }

        for holding in &self.holdings {
            if holding.company.trim().is_empty() {
                return Err(AnalyzerError::InvalidHolding {
                    fund: self.name.clone(),
                    company: holding.company.clone(),
                    reason: "company name is empty".into(),
                });
            }
            if holding.sector.trim().is_empty() {
                return Err(AnalyzerError::InvalidHolding {
                    fund: self.name.clone(),
                    company: holding.company.clone(),
                    reason: "sector is empty".into(),
                });
            }
            if holding.weight < Decimal::ZERO || holding.weight > dec!(100) {
                return Err(AnalyzerError::WeightOutOfRange {
                    fund: self.name.clone(),
                    company: holding.company.clone(),
                    weight: holding.weight,
                });
            }
        }

        Ok(())
    }
}

/// Investor risk classification, derived at onboarding
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskProfile {
    Conservative,
    #[default]
    Balanced,
    Aggressive,
}

impl RiskProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskProfile::Conservative => "Conservative",
            RiskProfile::Balanced => "Balanced",
            RiskProfile::Aggressive => "Aggressive",
        }
    }

    /// Lenient parse used at the boundary: unknown or missing → Balanced
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    /// Classify from onboarding answers
    pub fn from_onboarding(horizon: InvestmentHorizon, appetite: RiskAppetite) -> Self {
        match (horizon, appetite) {
            (InvestmentHorizon::Short, RiskAppetite::Low) => RiskProfile::Conservative,
            (InvestmentHorizon::Long, RiskAppetite::High) => RiskProfile::Aggressive,
            _ => RiskProfile::Balanced,
        }
    }

    /// Concentration limits for this profile
    pub fn limits(&self) -> SectorLimits {
        match self {
            RiskProfile::Conservative => SectorLimits::conservative(),
            RiskProfile::Balanced => SectorLimits::balanced(),
            RiskProfile::Aggressive => SectorLimits::aggressive(),
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskProfile {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" => Ok(RiskProfile::Conservative),
            "balanced" => Ok(RiskProfile::Balanced),
            "aggressive" => Ok(RiskProfile::Aggressive),
            _ => Err(AnalyzerError::InvalidRiskProfile(s.to_string())),
        }
    }
}

/// Sector concentration limits for a risk profile
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorLimits {
    /// A sector above this share of the portfolio is flagged (strictly greater)
    pub max_sector_percent: Decimal,

    /// Sectors the profile watches most closely
    pub reference_sectors: &'static [&'static str],
}

impl SectorLimits {
    pub fn conservative() -> Self {
        Self {
            max_sector_percent: dec!(30),
            reference_sectors: &["Banking", "IT"],
        }
    }

    pub fn balanced() -> Self {
        Self {
            max_sector_percent: dec!(40),
            reference_sectors: &["Banking", "IT", "Energy"],
        }
    }

    pub fn aggressive() -> Self {
        Self {
            max_sector_percent: dec!(50),
            reference_sectors: &["Banking", "IT", "Energy", "FMCG"],
        }
    }
}

/// Declared investment horizon
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentHorizon {
    Short,
    Medium,
    Long,
}

impl InvestmentHorizon {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "short" => Some(Self::Short),
            "medium" => Some(Self::Medium),
            "long" => Some(Self::Long),
            _ => None,
        }
    }
}

/// Declared appetite for risk
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskAppetite {
    Low,
    #[default]
    Moderate,
    High,
}

impl RiskAppetite {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "moderate" => Some(Self::Moderate),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bluechip() -> FundHolding {
        FundHolding::new(
            "Axis Bluechip Fund",
            dec!(100000),
            vec![
                Holding::new("HDFC Bank", "Banking", dec!(7.8)),
                Holding::new("Infosys", "IT", dec!(6.5)),
            ],
        )
    }

    #[test]
    fn test_exposure_of_holding() {
        let fund = bluechip();
        assert_eq!(fund.exposure_of(&fund.holdings[0]).unwrap(), dec!(7800));
    }

    #[test]
    fn test_total_of_overflowing_amounts_is_invalid_fund() {
        let big = dec!(50000000000000000000000000000);
        let funds = vec![
            FundHolding::new("First", big, vec![]),
            FundHolding::new("Second", big, vec![]),
        ];
        match FundHolding::total_of(&funds) {
            Err(AnalyzerError::InvalidFund { fund, reason }) => {
                assert_eq!(fund, "Second");
                assert_eq!(reason, "amount out of range");
            }
            other => panic!("expected InvalidFund, got {other:?}"),
        }
        assert_eq!(FundHolding::total_of(&funds[..1]).unwrap(), big);
    }

    #[test]
    fn test_validate_rejects_negative_amount() {
        let mut fund = bluechip();
        fund.amount = dec!(-1);
        assert!(matches!(fund.validate(), Err(AnalyzerError::InvalidFund { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_weight() {
        let mut fund = bluechip();
        fund.holdings[1].weight = dec!(100.5);
        let err = fund.validate().unwrap_err();
        assert!(matches!(err, AnalyzerError::WeightOutOfRange { .. }));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_validate_rejects_blank_sector() {
        let mut fund = bluechip();
        fund.holdings[0].sector = "  ".into();
        assert!(matches!(fund.validate(), Err(AnalyzerError::InvalidHolding { .. })));
    }

    #[test]
    fn test_fund_deserializes_from_boundary_json() {
        let json = r#"{"name": "Test Fund", "amount": 50000,
            "holdings": [{"company": "TCS", "sector": "IT", "weight": 8.3}]}"#;
        let fund: FundHolding = serde_json::from_str(json).unwrap();
        assert_eq!(fund.amount, dec!(50000));
        assert_eq!(fund.holdings[0].weight, dec!(8.3));
        assert!(fund.validate().is_ok());
    }

    #[test]
    fn test_missing_weight_is_rejected_at_boundary() {
        let json = r#"{"name": "Test Fund", "amount": 50000,
            "holdings": [{"company": "TCS", "sector": "IT"}]}"#;
        assert!(serde_json::from_str::<FundHolding>(json).is_err());
    }

    #[test]
    fn test_risk_profile_parsing() {
        assert_eq!(RiskProfile::parse_or_default("conservative"), RiskProfile::Conservative);
        assert_eq!(RiskProfile::parse_or_default("Aggressive"), RiskProfile::Aggressive);
        assert_eq!(RiskProfile::parse_or_default("yolo"), RiskProfile::Balanced);
        assert_eq!(RiskProfile::parse_or_default(""), RiskProfile::Balanced);
    }

    #[test]
    fn test_risk_profile_from_onboarding() {
        assert_eq!(
            RiskProfile::from_onboarding(InvestmentHorizon::Short, RiskAppetite::Low),
            RiskProfile::Conservative
        );
        assert_eq!(
            RiskProfile::from_onboarding(InvestmentHorizon::Long, RiskAppetite::High),
            RiskProfile::Aggressive
        );
        assert_eq!(
            RiskProfile::from_onboarding(InvestmentHorizon::Long, RiskAppetite::Low),
            RiskProfile::Balanced
        );
    }

    #[test]
    fn test_profile_limits() {
        assert_eq!(RiskProfile::Conservative.limits().max_sector_percent, dec!(30));
        assert_eq!(RiskProfile::Balanced.limits().reference_sectors, &["Banking", "IT", "Energy"]);
        assert_eq!(RiskProfile::Aggressive.limits().reference_sectors.len(), 4);
    }
}
