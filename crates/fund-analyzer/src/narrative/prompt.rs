//! Prompt Builder
//!
//! Turns an [`InsightRequest`] into the user message for the collaborator.
//! Each prompt spells out the JSON contract the reply must follow.

use super::text::{grouped, join_first};
use super::types::{InsightRequest, OnboardingAnswers};
use crate::analysis::{BasicAnalysis, DetailedAnalysis};
use crate::engine::{CompanyOverlap, SectorOverlap};

/// Rows listed per section of the detailed prompt
const TOP_ROWS: usize = 5;
/// Fund names listed per overlap row
const FUNDS_PER_ROW: usize = 3;

const DETAILED_CONTRACT: &str = r#"Return ONLY valid JSON in this exact format:
{
  "portfolioHealth": "overall health, referencing the overlaps",
  "overlappingHoldings": "which shares sit in several funds and why it matters",
  "overlappingSharesDetail": [
    {"company": "Company", "numberOfFunds": 3, "funds": ["Fund 1", "Fund 2", "Fund 3"], "totalExposurePercent": 15}
  ],
  "sectorCongestion": "which sectors are crowded across funds",
  "overlappingSectorsDetail": [
    {"sector": "Sector", "numberOfFunds": 3, "funds": ["Fund 1", "Fund 2", "Fund 3"], "totalExposurePercent": 35}
  ],
  "diversificationAssessment": "reading of the diversification score with suggestions",
  "diversificationScoreDetail": {"overall": 65, "level": "Good", "sectorDiversity": 20, "shareDiversity": 26, "concentrationScore": 19},
  "riskWarnings": [{"title": "specific risk with numbers", "message": "2-3 sentences using the data"}],
  "potentialSectors": [{"sector": "Sector", "reason": "why it is missing", "expectedCharacteristics": ["Growth", "Stability"]}],
  "suggestedAdjustments": "step-by-step rebalancing, naming sectors to add",
  "fundRecommendations": "fund categories for the recommended sectors",
  "fundRecommendationsDetail": [{"sector": "Sector", "fundType": "Sector-Specific Mutual Fund", "recommendation": "Add a fund focused on ...", "rationale": "..."}],
  "riskAlignment": "how the portfolio fits the risk profile"
}"#;

const BASIC_CONTRACT: &str = r#"Return ONLY valid JSON in this exact format:
{
  "portfolioHealth": "detailed explanation",
  "riskWarnings": [{"title": "clear risk title", "message": "2-3 sentence explanation"}],
  "sectorCongestion": "which sectors are overexposed and why it matters",
  "suggestedAdjustments": "step-by-step diversification guidance",
  "riskAlignment": "whether the portfolio suits the risk profile"
}"#;

const ONBOARDING_CONTRACT: &str = r#"Return ONLY valid JSON:
{
  "financialReadiness": "whether the user is ready to invest and why",
  "priorityChecklist": ["step with reason", "step with reason", "step with reason"],
  "investmentGuidance": "how and when to start investing",
  "nextSteps": "the next 2-3 actions"
}"#;

const RULES: &str = "Rules:
- No fund names, only fund categories and types
- No predictions of future returns
- Educational, neutral tone for retail investors
- Each explanation at least 3-4 sentences";

/// Prompt for `request`: detailed when a scored analysis is available,
/// basic for an existing investor without one, onboarding otherwise.
pub fn build_prompt(request: &InsightRequest<'_>) -> String {
    match request {
        InsightRequest::NewInvestor(answers) => onboarding_prompt(answers),
        InsightRequest::ExistingInvestor {
            portfolio,
            analysis,
        } if analysis.score().is_some() => detailed_prompt(portfolio, analysis),
        InsightRequest::ExistingInvestor { portfolio, .. } => basic_prompt(portfolio),
    }
}

fn profile_lines(portfolio: &BasicAnalysis) -> String {
    let limits = portfolio.risk_profile.limits();
    format!(
        "- Risk Profile: {}\n- Sector Limit: {}% per sector (watch {})",
        portfolio.risk_profile,
        limits.max_sector_percent,
        limits.reference_sectors.join(", "),
    )
}

fn share_rows(overlaps: &[CompanyOverlap]) -> String {
    if overlaps.is_empty() {
        return "No significant overlapping shares detected.".into();
    }
    overlaps
        .iter()
        .take(TOP_ROWS)
        .map(|o| {
            format!(
                "- {}: Found in {} funds ({}), Total Exposure: {}%",
                o.company,
                o.number_of_funds,
                join_first(o.funds.iter().map(String::as_str), FUNDS_PER_ROW),
                o.total_exposure_percent,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn sector_rows(overlaps: &[SectorOverlap]) -> String {
    if overlaps.is_empty() {
        return "Sectors are well-distributed across funds.".into();
    }
    overlaps
        .iter()
        .take(TOP_ROWS)
        .map(|o| {
            format!(
                "- {}: Present in {} funds ({}), Total Exposure: {}%",
                o.sector,
                o.number_of_funds,
                join_first(o.funds.iter().map(String::as_str), FUNDS_PER_ROW),
                o.total_exposure_percent,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn score_line(analysis: &DetailedAnalysis) -> String {
    match analysis.score() {
        Some(score) if score.overall > 0 => format!(
            "Overall Score: {}/100 ({}). {}. {}",
            score.overall,
            score.level(),
            score.assessment.description,
            score.assessment.suggestion,
        ),
        _ => "Diversification data not available.".into(),
    }
}

fn potential_rows(analysis: &DetailedAnalysis) -> String {
    if analysis.potential_sectors.is_empty() {
        return "All major sectors are already represented.".into();
    }
    analysis
        .potential_sectors
        .iter()
        .take(TOP_ROWS)
        .map(|p| format!("- {}: {}", p.sector, p.reason))
        .collect::<Vec<_>>()
        .join("\n")
}

fn detailed_prompt(portfolio: &BasicAnalysis, analysis: &DetailedAnalysis) -> String {
    let mut prompt = String::from(
        "You are a financial advisor analyzing a REAL mutual fund portfolio with detailed overlap analysis.\n\n",
    );

    prompt.push_str(&format!(
        "DETAILED PORTFOLIO DATA:\n- Total Funds: {}\n- Total Investment: ₹{}\n{}\n- Unique Sectors: {}\n- Unique Holdings: {}\n",
        analysis.total_funds,
        grouped(portfolio.total_investment),
        profile_lines(portfolio),
        analysis.unique_sectors.unwrap_or_default(),
        analysis.unique_shares.unwrap_or_default(),
    ));
    prompt.push_str(&format!(
        "\nOVERLAPPING SHARES (Concentration Risk):\n{}\n",
        share_rows(&analysis.overlapping_shares)
    ));
    prompt.push_str(&format!(
        "\nOVERLAPPING SECTORS:\n{}\n",
        sector_rows(&analysis.overlapping_sectors)
    ));
    prompt.push_str(&format!("\nDIVERSIFICATION ASSESSMENT:\n{}\n", score_line(analysis)));
    prompt.push_str(&format!("\nPOTENTIAL SECTORS TO ADD:\n{}\n", potential_rows(analysis)));

    prompt.push_str(
        "\nINSTRUCTIONS:
- Reference the specific shares and sectors above
- Explain how the overlaps reduce the benefit of holding several funds
- Use the diversification score (0-100) to judge portfolio quality
- Recommend only the listed potential sectors\n",
    );
    prompt.push_str(&format!("\n{DETAILED_CONTRACT}\n\n{RULES}\n"));
    prompt
}

fn basic_prompt(portfolio: &BasicAnalysis) -> String {
    let sector_exposure = portfolio
        .sector_exposure
        .iter()
        .map(|(sector, percent)| format!("{sector} {percent}%"))
        .collect::<Vec<_>>()
        .join(", ");
    let overlaps = portfolio
        .overlap_warnings
        .iter()
        .map(|o| format!("{} in {} funds ({}%)", o.company, o.fund_count, o.exposure))
        .collect::<Vec<_>>()
        .join(", ");
    let top_holdings = portfolio
        .company_exposure
        .iter()
        .take(TOP_ROWS)
        .map(|c| format!("{} {}%", c.name, c.exposure))
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt =
        String::from("You are a financial advisor analyzing a REAL mutual fund portfolio.\n\n");
    prompt.push_str(&format!(
        "PORTFOLIO DATA:\n- Total Investment: ₹{}\n{}\n- Sector Exposure: {}\n- Fund Overlaps: {}\n- Top Holdings: {}\n",
        grouped(portfolio.total_investment),
        profile_lines(portfolio),
        or_none(&sector_exposure),
        or_none(&overlaps),
        or_none(&top_holdings),
    ));
    prompt.push_str(
        "\nINSTRUCTIONS:
- Base the analysis only on the data above
- Explain why something is risky or sound\n",
    );
    prompt.push_str(&format!("\n{BASIC_CONTRACT}\n\n{RULES}\n"));
    prompt
}

fn onboarding_prompt(answers: &OnboardingAnswers) -> String {
    let answer = |value: Option<&String>| {
        value
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .unwrap_or("unknown")
            .to_string()
    };
    let monthly = answers
        .monthly_capacity()
        .map_or_else(|| "unknown".to_string(), |m| format!("₹{}", grouped(m)));

    let mut prompt =
        String::from("You are a friendly financial mentor guiding a FIRST-TIME investor.\n\n");
    prompt.push_str(&format!(
        "User details:\n- Insurance: {}\n- Emergency Fund (6 months): {}\n- Monthly Investment Capacity: {monthly}\n- Risk Appetite: {}\n- Investment Horizon: {}\n",
        answer(answers.has_insurance.as_ref()),
        answer(answers.has_emergency_fund.as_ref()),
        answer(answers.risk_appetite.as_ref()),
        answer(answers.investment_horizon.as_ref()),
    ));
    prompt.push_str(
        "\nIMPORTANT:
- Explain concepts clearly and calmly
- Financial safety comes first
- No selling or aggressive language\n",
    );
    prompt.push_str(&format!("\n{ONBOARDING_CONTRACT}\n\n{RULES}\n"));
    prompt
}

fn or_none(text: &str) -> &str {
    if text.is_empty() { "none" } else { text }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze_portfolio, analyze_portfolio_detailed};
    use crate::model::{FundHolding, Holding, RiskProfile};
    use rust_decimal_macros::dec;

    fn funds() -> Vec<FundHolding> {
        vec![
            FundHolding::new(
                "Alpha",
                dec!(60000),
                vec![
                    Holding::new("HDFC Bank", "Banking", dec!(9)),
                    Holding::new("TCS", "IT", dec!(8)),
                ],
            ),
            FundHolding::new(
                "Beta",
                dec!(40000),
                vec![
                    Holding::new("HDFC Bank", "Banking", dec!(7)),
                    Holding::new("ONGC", "Energy", dec!(6)),
                ],
            ),
        ]
    }

    #[test]
    fn test_detailed_prompt_when_scored() {
        let funds = funds();
        let portfolio = analyze_portfolio(&funds, RiskProfile::Conservative).unwrap();
        let analysis = analyze_portfolio_detailed(&funds).unwrap();
        let prompt = build_prompt(&InsightRequest::ExistingInvestor {
            portfolio: &portfolio,
            analysis: &analysis,
        });

        assert!(prompt.contains("DETAILED PORTFOLIO DATA"));
        assert!(prompt.contains("- Total Investment: ₹100,000"));
        assert!(prompt.contains("- HDFC Bank: Found in 2 funds (Alpha, Beta)"));
        assert!(prompt.contains("Sector Limit: 30% per sector (watch Banking, IT)"));
        assert!(prompt.contains("\"overlappingSharesDetail\""));
    }

    #[test]
    fn test_basic_prompt_without_score() {
        let portfolio = analyze_portfolio(&funds(), RiskProfile::Balanced).unwrap();
        let analysis = DetailedAnalysis::empty(2);
        let prompt = build_prompt(&InsightRequest::ExistingInvestor {
            portfolio: &portfolio,
            analysis: &analysis,
        });

        assert!(prompt.contains("PORTFOLIO DATA:"));
        assert!(!prompt.contains("DETAILED"));
        assert!(prompt.contains("HDFC Bank in 2 funds"));
    }

    #[test]
    fn test_onboarding_prompt_marks_unknowns() {
        let answers = OnboardingAnswers {
            has_insurance: Some("yes".into()),
            ..Default::default()
        };
        let prompt = build_prompt(&InsightRequest::NewInvestor(&answers));
        assert!(prompt.contains("- Insurance: yes"));
        assert!(prompt.contains("- Monthly Investment Capacity: unknown"));
        assert!(prompt.contains("\"financialReadiness\""));
    }
}
