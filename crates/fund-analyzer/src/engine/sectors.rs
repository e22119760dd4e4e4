//! Sector gap analysis
//!
//! Compares the portfolio's sectors against a fixed list of common market
//! sectors and proposes fund archetypes for the missing ones.

use serde::Serialize;

/// Common Indian market sectors, in suggestion order
pub const COMMON_SECTORS: [&str; 20] = [
    "Financial Services",
    "Information Technology",
    "Banking",
    "Insurance",
    "FMCG",
    "Healthcare",
    "Pharmaceuticals",
    "Utilities",
    "Telecommunications",
    "Consumer Discretionary",
    "Real Estate",
    "Energy",
    "Oil & Gas",
    "Infrastructure",
    "Industrial Manufacturing",
    "Materials",
    "Metals",
    "Automobiles",
    "Construction",
    "Media & Entertainment",
];

/// How many sector recommendations the detailed analysis carries
const RECOMMENDATION_LIMIT: usize = 5;

/// A common sector absent from the portfolio
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PotentialSector {
    pub sector: String,
    pub reason: String,
}

/// A suggested fund archetype for an unrepresented sector
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundRecommendation {
    pub sector: String,
    pub recommendation: String,
    pub rationale: String,
    pub fund_type: &'static str,
    pub expected_characteristics: &'static [&'static str],
}

/// Fund archetype typically used to gain exposure to `sector`
pub fn fund_type_for(sector: &str) -> &'static str {
    match sector {
        "Financial Services" => "Sector Fund / Focused Fund",
        "Information Technology" => "Sector Fund / Tech Fund",
        "Banking" => "Sector Fund / Banking Fund",
        "Insurance" => "Sector Fund / Financial Services Fund",
        "FMCG" => "Sector Fund / FMCG Fund",
        "Healthcare" | "Pharmaceuticals" => "Sector Fund / Healthcare Fund",
        "Utilities" | "Infrastructure" => "Sector Fund / Infrastructure Fund",
        "Telecommunications" => "Sector Fund / Telecom Fund",
        "Consumer Discretionary" | "Media & Entertainment" => "Thematic Fund",
        "Real Estate" => "Sector Fund / Realty Fund",
        "Energy" | "Oil & Gas" => "Sector Fund / Energy Fund",
        "Materials" => "Sector Fund / Commodities Fund",
        "Metals" => "Thematic Fund / Commodities Fund",
        "Automobiles" => "Sector Fund / Auto Fund",
        "Construction" => "Sector Fund / Construction Fund",
        _ => "Sector Fund",
    }
}

/// Qualitative traits investors can expect from `sector`
pub fn expected_characteristics(sector: &str) -> &'static [&'static str] {
    match sector {
        "Financial Services" => &["Growth potential", "Cyclical", "Market-sensitive"],
        "Information Technology" => &["High growth", "Volatile", "Global exposure"],
        "Banking" => &["Stable returns", "Dividend-paying", "Interest rate sensitive"],
        "Insurance" => &["Stable earnings", "Growth potential", "Regulatory sensitive"],
        "FMCG" => &["Defensive", "Stable", "Inflation hedge"],
        "Healthcare" => &["Growth", "Defensive", "Regulatory risks"],
        "Pharmaceuticals" => &["Growth", "Quality earnings", "Global demand"],
        "Utilities" => &["Defensive", "Dividend-paying", "Regular returns"],
        "Telecommunications" => &["Stable", "Cyclical", "Infrastructure"],
        "Consumer Discretionary" | "Media & Entertainment" => {
            &["Cyclical", "Growth", "Discretionary spending"]
        }
        "Real Estate" => &["Cyclical", "Growth", "Interest-rate sensitive"],
        "Energy" => &["Cyclical", "Commodity-dependent", "High volatility"],
        "Oil & Gas" => &["Commodity-dependent", "High volatility", "Capital intensive"],
        "Infrastructure" => &["Growth", "Long-term", "Policy dependent"],
        "Industrial Manufacturing" => &["Cyclical", "Economic growth dependent", "Volatile"],
        "Materials" => &["Cyclical", "Commodity-dependent", "Global demand"],
        "Metals" => &["Commodity-dependent", "Inflation hedge", "Volatile"],
        "Automobiles" => &["Cyclical", "Growth potential", "Economic sensitive"],
        "Construction" => &["Cyclical", "Growth", "Policy dependent"],
        _ => &["Growth potential", "Diversification"],
    }
}

/// Common sectors not present in `held`, in [`COMMON_SECTORS`] order.
///
/// Matching is literal: "IT" held does not cover "Information Technology".
pub fn potential_sectors<'a>(held: impl IntoIterator<Item = &'a str>) -> Vec<PotentialSector> {
    let held: Vec<&str> = held.into_iter().collect();
    COMMON_SECTORS
        .iter()
        .filter(|sector| !held.contains(sector))
        .map(|sector| PotentialSector {
            sector: (*sector).to_string(),
            reason: "Currently not represented in portfolio".to_string(),
        })
        .collect()
}

/// Fund suggestions for the first few potential sectors
pub fn fund_recommendations(potential: &[PotentialSector]) -> Vec<FundRecommendation> {
    potential
        .iter()
        .take(RECOMMENDATION_LIMIT)
        .map(|p| FundRecommendation {
            sector: p.sector.clone(),
            recommendation: format!(
                "Explore mutual funds focused on {} to add diversification",
                p.sector
            ),
            rationale: format!(
                "{} is not currently in your portfolio and can diversify your risk",
                p.sector
            ),
            fund_type: fund_type_for(&p.sector),
            expected_characteristics: expected_characteristics(&p.sector),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_potential_sectors_exclude_held() {
        let potential = potential_sectors(["Banking", "Energy", "IT"]);
        assert_eq!(potential.len(), 18);
        assert_eq!(potential[0].sector, "Financial Services");
        assert_eq!(potential[2].sector, "Insurance");
        assert!(potential.iter().all(|p| p.sector != "Banking"));
    }

    #[test]
    fn test_recommendations_take_first_five() {
        let recs = fund_recommendations(&potential_sectors(["Banking"]));
        assert_eq!(recs.len(), 5);
        assert_eq!(recs[1].sector, "Information Technology");
        assert_eq!(recs[1].fund_type, "Sector Fund / Tech Fund");
        assert_eq!(
            recs[0].recommendation,
            "Explore mutual funds focused on Financial Services to add diversification"
        );
    }

    #[test]
    fn test_lookup_tables_cover_common_sectors() {
        for sector in COMMON_SECTORS {
            assert_eq!(expected_characteristics(sector).len(), 3, "{sector}");
        }
        assert_eq!(fund_type_for("Industrial Manufacturing"), "Sector Fund");
    }

    #[test]
    fn test_unknown_sector_falls_back() {
        assert_eq!(fund_type_for("Space Tourism"), "Sector Fund");
        assert_eq!(
            expected_characteristics("Space Tourism"),
            &["Growth potential", "Diversification"]
        );
    }

    #[test]
    fn test_every_common_sector_held_leaves_nothing() {
        assert!(potential_sectors(COMMON_SECTORS).is_empty());
        assert!(fund_recommendations(&[]).is_empty());
    }
}
