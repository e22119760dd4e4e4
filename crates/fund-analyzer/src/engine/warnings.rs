//! Warning Generator
//!
//! Applies risk-profile thresholds to the aggregated exposure. Output order
//! is fixed: sector warnings, then overlap warnings, then the
//! diversification warning.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::{CompanyOverlap, ExposureLedger, fixed};
use crate::model::RiskProfile;

/// Overlapping companies above this share of the portfolio are flagged
const OVERLAP_EXPOSURE_LIMIT: Decimal = dec!(10);

/// Fewer distinct sectors than this is flagged
const MIN_SECTORS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningKind {
    Sector,
    Overlap,
    Diversification,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Warning {
    #[serde(rename = "type")]
    pub kind: WarningKind,
    pub title: String,
    pub message: String,
}

impl Warning {
    fn sector(sector: &str, percent: Decimal, profile: RiskProfile) -> Self {
        let max = profile.limits().max_sector_percent;
        Self {
            kind: WarningKind::Sector,
            title: format!("High {sector} Exposure"),
            message: format!(
                "{sector} sector represents {}% of your portfolio, which exceeds the recommended {max}% for {} investors.",
                fixed(percent, 1),
                profile.as_str().to_ascii_lowercase(),
            ),
        }
    }

    fn overlap(overlap: &CompanyOverlap) -> Self {
        Self {
            kind: WarningKind::Overlap,
            title: format!("Company Overlap: {}", overlap.company),
            message: format!(
                "{} appears in {} funds with {}% total exposure, reducing diversification benefits.",
                overlap.company, overlap.number_of_funds, overlap.total_exposure_percent
            ),
        }
    }

    fn diversification(sector_count: usize) -> Self {
        Self {
            kind: WarningKind::Diversification,
            title: "Limited Sector Diversification".to_string(),
            message: format!(
                "Your portfolio spans only {sector_count} sectors. Consider adding funds in other sectors for better diversification."
            ),
        }
    }
}

/// Flag over-concentration, heavy overlap and thin sector coverage.
///
/// Sector shares are compared unrounded and strictly: a sector at exactly
/// the profile maximum passes.
pub fn generate_warnings(
    ledger: &ExposureLedger,
    overlaps: &[CompanyOverlap],
    profile: RiskProfile,
) -> Vec<Warning> {
    let max = profile.limits().max_sector_percent;
    let mut warnings: Vec<Warning> = ledger
        .sectors
        .iter()
        .map(|(sector, value)| (sector, ledger.percent(value)))
        .filter(|(_, percent)| *percent > max)
        .map(|(sector, percent)| Warning::sector(sector, percent, profile))
        .collect();

    warnings.extend(
        overlaps
            .iter()
            .filter(|o| o.total_exposure_percent > OVERLAP_EXPOSURE_LIMIT)
            .map(Warning::overlap),
    );

    if ledger.sectors.len() < MIN_SECTORS {
        warnings.push(Warning::diversification(ledger.sectors.len()));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::OverlapScan;
    use crate::model::{FundHolding, Holding};

    fn warnings_for(funds: &[FundHolding], profile: RiskProfile) -> Vec<Warning> {
        let ledger = ExposureLedger::aggregate(funds).unwrap();
        let overlaps = OverlapScan::scan(funds).unwrap().company_overlaps();
        generate_warnings(&ledger, &overlaps, profile)
    }

    fn five_sector_fund(banking: Decimal) -> FundHolding {
        let rest = (dec!(100) - banking) / dec!(4);
        FundHolding::new(
            "Diversified",
            dec!(100000),
            vec![
                Holding::new("HDFC Bank", "Banking", banking),
                Holding::new("TCS", "IT", rest),
                Holding::new("ONGC", "Energy", rest),
                Holding::new("ITC", "FMCG", rest),
                Holding::new("Sun Pharma", "Pharma", rest),
            ],
        )
    }

    #[test]
    fn test_sector_at_limit_is_not_flagged() {
        let warnings = warnings_for(&[five_sector_fund(dec!(30.00))], RiskProfile::Conservative);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_sector_just_over_limit_is_flagged() {
        let warnings = warnings_for(&[five_sector_fund(dec!(30.01))], RiskProfile::Conservative);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::Sector);
        assert_eq!(warnings[0].title, "High Banking Exposure");
        assert_eq!(
            warnings[0].message,
            "Banking sector represents 30.0% of your portfolio, which exceeds the recommended 30% for conservative investors."
        );
    }

    #[test]
    fn test_balanced_allows_more_concentration() {
        let warnings = warnings_for(&[five_sector_fund(dec!(35))], RiskProfile::Balanced);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_fixed_order_sector_overlap_diversification() {
        let funds = vec![
            FundHolding::new("A", dec!(50000), vec![Holding::new("HDFC Bank", "Banking", dec!(100))]),
            FundHolding::new("B", dec!(50000), vec![Holding::new("HDFC Bank", "Banking", dec!(100))]),
        ];
        let warnings = warnings_for(&funds, RiskProfile::Aggressive);
        let kinds: Vec<_> = warnings.iter().map(|w| w.kind).collect();
        assert_eq!(
            kinds,
            vec![WarningKind::Sector, WarningKind::Overlap, WarningKind::Diversification]
        );
        assert_eq!(
            warnings[1].message,
            "HDFC Bank appears in 2 funds with 100% total exposure, reducing diversification benefits."
        );
        assert_eq!(
            warnings[2].message,
            "Your portfolio spans only 1 sectors. Consider adding funds in other sectors for better diversification."
        );
    }

    #[test]
    fn test_overlap_at_ten_percent_is_not_flagged() {
        let funds = vec![
            FundHolding::new("A", dec!(50000), vec![Holding::new("Infosys", "IT", dec!(10))]),
            FundHolding::new("B", dec!(50000), vec![Holding::new("Infosys", "IT", dec!(10))]),
        ];
        let warnings = warnings_for(&funds, RiskProfile::Balanced);
        assert!(warnings.iter().all(|w| w.kind != WarningKind::Overlap));
    }

    #[test]
    fn test_serialized_type_tag() {
        let json = serde_json::to_value(Warning::diversification(2)).unwrap();
        assert_eq!(json["type"], "diversification");
    }
}
