//! # fund-analyzer
//!
//! Mutual-fund portfolio analysis: sector and company exposure, overlap
//! between funds, diversification scoring and risk-profile warnings, with
//! an optional generative-text narrative on top.
//!
//! ## Philosophy
//!
//! Holding several funds is not the same as being diversified:
//!
//! - **Exposure is absolute** - weights are applied to each fund's amount, then summed
//! - **Overlap is per fund** - a company in three funds counts three funds, not three holdings
//! - **Thresholds follow the investor** - Conservative, Balanced and Aggressive limits differ
//! - **Narratives never block** - without a collaborator, a deterministic fallback is returned
//!
//! ## Example: ₹1,00,000 across two large-cap funds
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Fund A ₹60,000          Fund B ₹40,000                     │
//! │  HDFC Bank   9%          HDFC Bank   7%                     │
//! │  TCS         8%          ONGC        6%                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  HDFC Bank  ₹5,400 + ₹2,800 = ₹8,200  (8.2%)  in 2 funds    │
//! │  TCS        ₹4,800                    (4.8%)  in 1 fund     │
//! │  ONGC       ₹2,400                    (2.4%)  in 1 fund     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Flow
//!
//! ```text
//! HoldingsSource → ExposureLedger → { OverlapScan, DiversificationScore }
//!                → generate_warnings → NarrativeFormatter → caller
//! ```

pub mod analysis;
pub mod engine;
pub mod error;
pub mod holdings;
pub mod model;
pub mod narrative;

pub use analysis::{
    BasicAnalysis, DetailedAnalysis, ScoreOutcome, analyze_portfolio, analyze_portfolio_detailed,
};
pub use error::{AnalyzerError, Result};
pub use holdings::{CATALOG_FUNDS, CatalogHoldingsSource, HoldingsSource};
pub use model::{FundHolding, Holding, InvestmentHorizon, RiskAppetite, RiskProfile, SectorLimits};
pub use narrative::{InsightRequest, InsightSource, Insights, NarrativeFormatter, OnboardingAnswers};

/// System prompt for the portfolio narrative collaborator
pub const FUND_ADVISOR_PROMPT: &str = r#"You are an educational mutual fund advisor for Indian retail investors, focused on diversification and risk awareness.

## Principles

1. **Safety first** - Insurance and an emergency fund come before investing
2. **Real diversification** - Several funds holding the same companies are not diversified
3. **Profile fit** - Judge concentration against the investor's risk profile
4. **No product selling** - Talk about fund categories and types, never named funds

## Output

- Answer with a single JSON object in exactly the format the user message asks for
- No markdown, no commentary outside the JSON
- Quote the numbers you are given; never invent holdings or returns
- Never predict future returns"#;
