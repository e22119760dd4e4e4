//! Deterministic Fallback
//!
//! Template narratives built straight from the analysis. Used whenever the
//! collaborator is missing, slow or unintelligible; the same input always
//! yields byte-identical output.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::text::{join_first, lower_first, rupees};
use super::types::{
    FundSuggestion, InsightRequest, InsightSource, Insights, OnboardingAnswers, OverlapDetail,
    PortfolioInsights, ReadinessInsights, RiskWarning, ScoreDetail, SectorDetail,
    SectorSuggestion,
};
use crate::analysis::{BasicAnalysis, DetailedAnalysis};
use crate::engine::expected_characteristics;
use crate::model::RiskAppetite;

/// Scores below this get an explicit low-diversification warning
const LOW_SCORE: u32 = 50;
/// SIP suggested when monthly capacity is unknown
const DEFAULT_SIP: Decimal = dec!(1000);
/// Months of capacity an emergency fund should cover
const EMERGENCY_MONTHS: Decimal = dec!(6);
/// Share of monthly capacity suggested as SIP
const SIP_SHARE: Decimal = dec!(0.1);

/// Fallback narrative for `request`
pub fn fallback_insights(request: &InsightRequest<'_>) -> Insights {
    match request {
        InsightRequest::NewInvestor(answers) => Insights::Readiness(readiness(answers)),
        InsightRequest::ExistingInvestor {
            portfolio,
            analysis,
        } => Insights::Portfolio(portfolio_review(portfolio, analysis)),
    }
}

fn portfolio_review(portfolio: &BasicAnalysis, analysis: &DetailedAnalysis) -> PortfolioInsights {
    let total = if portfolio.total_investment > Decimal::ZERO {
        rupees(portfolio.total_investment)
    } else {
        "an undisclosed amount".to_string()
    };
    let fund_count = if analysis.total_funds > 0 {
        analysis.total_funds.to_string()
    } else {
        "multiple".to_string()
    };
    let profile = portfolio.risk_profile;
    let score = analysis.score();
    let overlaps = &analysis.overlapping_shares;
    let sector_overlaps = &analysis.overlapping_sectors;

    let suggested = {
        let names = join_first(analysis.potential_sectors.iter().map(|p| p.sector.as_str()), 3);
        if names.is_empty() { "new sectors".to_string() } else { names }
    };

    let score_text = score.map_or_else(
        || "N/A/100".to_string(),
        |s| format!("{}/100 ({})", s.overall, s.level()),
    );
    let portfolio_health = format!(
        "Your portfolio has {total} across {fund_count} funds with a {profile} risk profile. \
         With a diversification score of {score_text}, the portfolio has moderate to high concentration risk. \
         Reducing overlaps and adding new sectors will improve portfolio quality."
    );

    let overlapping_holdings = match overlaps.first() {
        Some(top) => format!(
            "Companies like {} appear across multiple funds, with total exposure of {}%. \
             This overlap means you're concentrated in the same holdings across different funds, \
             which defeats the purpose of diversification. Consider replacing funds with overlapping holdings.",
            join_first(overlaps.iter().map(|o| o.company.as_str()), 2),
            top.total_exposure_percent,
        ),
        None => "Your portfolio shows minimal overlap in individual holdings, which is positive for true diversification.".to_string(),
    };

    let sector_congestion = match sector_overlaps.first() {
        Some(top) => format!(
            "Sectors like {} appear across {} or more funds. \
             This concentration increases sector-specific risk; if that sector underperforms, \
             multiple funds will be impacted similarly. Diversify into unrepresented sectors.",
            join_first(sector_overlaps.iter().map(|s| s.sector.as_str()), 2),
            top.number_of_funds,
        ),
        None => "Sectors are generally well-distributed without major concentration.".to_string(),
    };

    let diversification_assessment = match score {
        Some(s) => format!(
            "Your diversification score of {}/100 ({}) indicates {}. To improve: {}. \
             Specifically, consider adding funds in {suggested}.",
            s.overall,
            s.level(),
            lower_first(&s.assessment.description),
            s.assessment.suggestion,
        ),
        None => format!(
            "A diversification score is not available for this portfolio. \
             To improve: add more diverse sectors. Specifically, consider adding funds in {suggested}."
        ),
    };

    let mut risk_warnings = Vec::new();
    if let Some(top) = overlaps.first() {
        risk_warnings.push(RiskWarning::new(
            "Significant Holding Overlap",
            format!(
                "{} appears in {} funds with {}% exposure. This overlap reduces diversification benefits and increases company-specific risk.",
                top.company, top.number_of_funds, top.total_exposure_percent
            ),
        ));
    }
    if let Some(top) = sector_overlaps.first() {
        risk_warnings.push(RiskWarning::new(
            "Sector Concentration",
            format!(
                "{} is present across multiple funds with {}% total exposure. Sector concentration increases systematic risk. Add unrepresented sectors to reduce this risk.",
                top.sector, top.total_exposure_percent
            ),
        ));
    }
    if score.is_some_and(|s| s.overall > 0 && s.overall < LOW_SCORE) {
        risk_warnings.push(RiskWarning::new(
            "Low Diversification",
            "Your portfolio needs significant diversification improvements. Prioritize adding funds in new sectors and replacing overlapping holdings.",
        ));
    }
    if risk_warnings.is_empty() {
        risk_warnings.push(RiskWarning::new(
            "Analysis data incomplete",
            "Unable to assess specific overlaps from available data.",
        ));
    }

    PortfolioInsights {
        portfolio_health,
        overlapping_holdings: Some(overlapping_holdings),
        overlapping_shares_detail: Some(
            overlaps
                .iter()
                .map(|o| OverlapDetail {
                    company: o.company.clone(),
                    number_of_funds: o.number_of_funds,
                    funds: o.funds.clone(),
                    total_exposure_percent: o.total_exposure_percent,
                })
                .collect(),
        ),
        sector_congestion,
        overlapping_sectors_detail: Some(
            sector_overlaps
                .iter()
                .map(|s| SectorDetail {
                    sector: s.sector.clone(),
                    number_of_funds: s.number_of_funds,
                    funds: s.funds.clone(),
                    total_exposure_percent: s.total_exposure_percent,
                })
                .collect(),
        ),
        diversification_assessment: Some(diversification_assessment),
        diversification_score_detail: score.map(|s| ScoreDetail {
            overall: s.overall,
            level: s.level().to_string(),
            sector_diversity: s.sector_diversity,
            share_diversity: s.share_diversity,
            concentration_score: s.concentration_score,
        }),
        risk_warnings,
        potential_sectors: Some(
            analysis
                .potential_sectors
                .iter()
                .take(5)
                .map(|p| SectorSuggestion {
                    sector: p.sector.clone(),
                    reason: p.reason.clone(),
                    expected_characteristics: expected_characteristics(&p.sector)
                        .iter()
                        .map(ToString::to_string)
                        .collect(),
                })
                .collect(),
        ),
        suggested_adjustments: format!(
            "Step 1: Replace 1-2 funds with the highest overlap. Step 2: Add sector funds in {suggested}. \
             Step 3: Rebalance quarterly and monitor overlap. This will improve your diversification score and reduce concentration risk."
        ),
        fund_recommendations: Some(format!(
            "Explore funds focused on {suggested} such as sector-specific mutual funds or thematic funds. \
             Look for funds with low expense ratios and minimal overlap with your existing holdings. \
             Diversified index funds in new sectors can also add variety."
        )),
        fund_recommendations_detail: Some(
            analysis
                .potential_sectors
                .iter()
                .take(3)
                .map(|p| FundSuggestion {
                    sector: p.sector.clone(),
                    fund_type: "Sector-Specific Mutual Fund".to_string(),
                    recommendation: format!(
                        "Add a fund focused on {} to diversify away from current concentration.",
                        p.sector
                    ),
                    rationale: p.reason.clone(),
                })
                .collect(),
        ),
        risk_alignment: format!(
            "Your portfolio does not fully align with a {profile} profile due to concentration issues. \
             With the suggested improvements, especially adding new sectors and reducing overlaps, \
             it will better reflect your intended risk appetite."
        ),
        source: InsightSource::Fallback,
    }
}

fn readiness(answers: &OnboardingAnswers) -> ReadinessInsights {
    // a capacity whose emergency target does not fit a Decimal counts as unknown
    let capacity = answers
        .monthly_capacity()
        .and_then(|m| Some((m, m.checked_mul(EMERGENCY_MONTHS)?)));
    let emergency_target = capacity.map_or_else(
        || "6 months of expenses".to_string(),
        |(_, target)| format!("~{}", rupees(target)),
    );
    let insured = answers.insured();
    let emergency_ready = answers.has_emergency_fund();

    let financial_readiness = [
        if insured {
            "You have insurance coverage, which is important.".to_string()
        } else {
            "You lack insurance; this is a priority before investing.".to_string()
        },
        if emergency_ready {
            "Your emergency fund is ready, so you can start investing.".to_string()
        } else {
            format!("Build an emergency fund of about {emergency_target}.")
        },
    ]
    .join(" ");

    let mut priority_checklist = Vec::new();
    if !emergency_ready {
        priority_checklist.push(format!("Build emergency fund ({emergency_target})"));
    }
    if !insured {
        priority_checklist.push("Get health and life insurance".to_string());
    }
    priority_checklist.push("Start a small SIP once safety net is in place".to_string());

    let sip = capacity
        .and_then(|(m, _)| m.checked_mul(SIP_SHARE))
        .map_or(DEFAULT_SIP, |share| {
            share.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        });
    let allocation = match answers.appetite().unwrap_or_default() {
        RiskAppetite::Low => "60% debt, 30% equity, 10% balanced",
        RiskAppetite::High => "70% equity, 20% growth, 10% debt",
        RiskAppetite::Moderate => "50% equity, 30% debt, 20% hybrid",
    };

    ReadinessInsights {
        financial_readiness,
        next_steps: join_steps(&priority_checklist),
        priority_checklist,
        investment_guidance: format!("Suggested allocation: {allocation}. SIP: {}", rupees(sip)),
        source: InsightSource::Fallback,
    }
}

fn join_steps(checklist: &[String]) -> String {
    checklist
        .iter()
        .take(3)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" Then ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze_portfolio, analyze_portfolio_detailed};
    use crate::narrative::types::FormAmount;
    use crate::model::{FundHolding, Holding, RiskProfile};

    fn overlapping_funds() -> Vec<FundHolding> {
        vec![
            FundHolding::new("Alpha", dec!(50000), vec![Holding::new("HDFC Bank", "Banking", dec!(100))]),
            FundHolding::new("Beta", dec!(50000), vec![Holding::new("HDFC Bank", "Banking", dec!(100))]),
        ]
    }

    fn review(funds: &[FundHolding], profile: RiskProfile) -> PortfolioInsights {
        let portfolio = analyze_portfolio(funds, profile).unwrap();
        let analysis = analyze_portfolio_detailed(funds).unwrap();
        match fallback_insights(&InsightRequest::ExistingInvestor {
            portfolio: &portfolio,
            analysis: &analysis,
        }) {
            Insights::Portfolio(p) => p,
            Insights::Readiness(_) => panic!("wrong shape"),
        }
    }

    fn readiness_for(answers: &OnboardingAnswers) -> ReadinessInsights {
        match fallback_insights(&InsightRequest::NewInvestor(answers)) {
            Insights::Readiness(r) => r,
            Insights::Portfolio(_) => panic!("wrong shape"),
        }
    }

    #[test]
    fn test_existing_investor_fallback_text() {
        let insights = review(&overlapping_funds(), RiskProfile::Conservative);
        assert_eq!(insights.source, InsightSource::Fallback);
        assert!(insights.portfolio_health.starts_with(
            "Your portfolio has ₹100,000 across 2 funds with a Conservative risk profile. \
             With a diversification score of 4/100 (Poor)"
        ));
        assert!(
            insights
                .overlapping_holdings
                .as_deref()
                .unwrap()
                .starts_with("Companies like HDFC Bank appear across multiple funds, with total exposure of 100%.")
        );

        let titles: Vec<_> = insights.risk_warnings.iter().map(|w| w.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Significant Holding Overlap", "Sector Concentration", "Low Diversification"]
        );
        assert!(insights.diversification_assessment.as_deref().unwrap().contains(
            "indicates your portfolio is concentrated with high overlap and limited sector diversity."
        ));
        assert!(insights.suggested_adjustments.contains(
            "Add sector funds in Financial Services, Information Technology, Insurance."
        ));
    }

    #[test]
    fn test_detail_arrays_use_real_subscores() {
        let insights = review(&overlapping_funds(), RiskProfile::Balanced);
        let detail = insights.diversification_score_detail.unwrap();
        assert_eq!(detail.sector_diversity, 3);
        assert_eq!(detail.share_diversity, 1);
        assert_eq!(detail.concentration_score, 0);
        assert_eq!(insights.overlapping_shares_detail.unwrap()[0].funds, vec!["Alpha", "Beta"]);
        assert_eq!(insights.potential_sectors.as_ref().unwrap().len(), 5);
        assert_eq!(
            insights.potential_sectors.unwrap()[0].expected_characteristics,
            vec!["Growth potential", "Cyclical", "Market-sensitive"]
        );
        assert_eq!(insights.fund_recommendations_detail.unwrap().len(), 3);
    }

    #[test]
    fn test_incomplete_warning_when_nothing_to_flag() {
        let portfolio = BasicAnalysis::empty(RiskProfile::Balanced);
        let analysis = DetailedAnalysis::empty(0);
        let insights = match fallback_insights(&InsightRequest::ExistingInvestor {
            portfolio: &portfolio,
            analysis: &analysis,
        }) {
            Insights::Portfolio(p) => p,
            Insights::Readiness(_) => panic!("wrong shape"),
        };
        assert_eq!(insights.risk_warnings.len(), 1);
        assert_eq!(insights.risk_warnings[0].title, "Analysis data incomplete");
        assert!(insights.diversification_score_detail.is_none());
        assert!(insights.portfolio_health.starts_with(
            "Your portfolio has an undisclosed amount across multiple funds"
        ));
        assert!(insights.suggested_adjustments.contains("Add sector funds in new sectors."));
    }

    #[test]
    fn test_fallback_is_byte_identical() {
        let funds = overlapping_funds();
        let portfolio = analyze_portfolio(&funds, RiskProfile::Balanced).unwrap();
        let analysis = analyze_portfolio_detailed(&funds).unwrap();
        let request = InsightRequest::ExistingInvestor {
            portfolio: &portfolio,
            analysis: &analysis,
        };
        let first = serde_json::to_string(&fallback_insights(&request)).unwrap();
        let second = serde_json::to_string(&fallback_insights(&request)).unwrap();
        assert_eq!(first, second);

        let answers = OnboardingAnswers::default();
        let first = serde_json::to_string(&fallback_insights(&InsightRequest::NewInvestor(&answers))).unwrap();
        let second = serde_json::to_string(&fallback_insights(&InsightRequest::NewInvestor(&answers))).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_new_investor_without_safety_net() {
        let answers = OnboardingAnswers {
            has_insurance: Some("no".into()),
            has_emergency_fund: Some("no".into()),
            monthly_investment: Some(FormAmount::Text("20000".into())),
            risk_appetite: Some("low".into()),
            investment_horizon: None,
        };
        let insights = readiness_for(&answers);
        assert_eq!(
            insights.financial_readiness,
            "You lack insurance; this is a priority before investing. Build an emergency fund of about ~₹120,000."
        );
        assert_eq!(
            insights.priority_checklist,
            vec![
                "Build emergency fund (~₹120,000)",
                "Get health and life insurance",
                "Start a small SIP once safety net is in place",
            ]
        );
        assert_eq!(
            insights.investment_guidance,
            "Suggested allocation: 60% debt, 30% equity, 10% balanced. SIP: ₹2,000"
        );
        assert_eq!(
            insights.next_steps,
            "Build emergency fund (~₹120,000) Then Get health and life insurance Then Start a small SIP once safety net is in place"
        );
    }

    #[test]
    fn test_new_investor_ready_to_start() {
        let answers = OnboardingAnswers {
            has_insurance: Some("yes".into()),
            has_emergency_fund: Some("Yes".into()),
            monthly_investment: None,
            risk_appetite: Some("HIGH".into()),
            investment_horizon: Some("long".into()),
        };
        let insights = readiness_for(&answers);
        assert_eq!(
            insights.financial_readiness,
            "You have insurance coverage, which is important. Your emergency fund is ready, so you can start investing."
        );
        assert_eq!(insights.priority_checklist.len(), 1);
        assert_eq!(
            insights.investment_guidance,
            "Suggested allocation: 70% equity, 20% growth, 10% debt. SIP: ₹1,000"
        );
        assert_eq!(insights.next_steps, "Start a small SIP once safety net is in place");
    }

    #[test]
    fn test_oversized_capacity_is_treated_as_unknown() {
        let answers = OnboardingAnswers {
            has_emergency_fund: Some("no".into()),
            monthly_investment: Some(FormAmount::Text("20000000000000000000000000000".into())),
            ..OnboardingAnswers::default()
        };
        let insights = readiness_for(&answers);
        assert!(insights.financial_readiness.ends_with("Build an emergency fund of about 6 months of expenses."));
        assert_eq!(insights.priority_checklist[0], "Build emergency fund (6 months of expenses)");
        assert!(insights.investment_guidance.ends_with("SIP: ₹1,000"));
    }

    #[test]
    fn test_unanswered_questionnaire_uses_moderate_defaults() {
        let insights = readiness_for(&OnboardingAnswers::default());
        assert!(insights.financial_readiness.contains("about 6 months of expenses"));
        assert!(insights.investment_guidance.starts_with("Suggested allocation: 50% equity, 30% debt, 20% hybrid"));
    }
}
