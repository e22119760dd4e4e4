//! Portfolio analyses
//!
//! The two entry points of the engine: [`analyze_portfolio`] for the
//! dashboard view and [`analyze_portfolio_detailed`] for overlap and
//! diversification reports. Both are pure functions of the fund list.

use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::engine::{
    CompanyOverlap, DiversificationScore, ExposureLedger, FundRecommendation, OverlapScan,
    PotentialSector, SectorOverlap, Warning, fund_recommendations, generate_warnings,
    potential_sectors, round_to,
};
use crate::error::Result;
use crate::model::{FundHolding, RiskProfile};

/// Decimals for the basic sector view
const SECTOR_DP: u32 = 1;
/// Decimals for company and detailed percentages
const COMPANY_DP: u32 = 2;

/// One slice of the sector distribution chart
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectorSlice {
    pub name: String,
    pub value: Decimal,
}

/// A company's share of the whole portfolio
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompanyShare {
    pub name: String,
    pub exposure: Decimal,
}

/// A company held by more than one fund, as shown on the dashboard
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapWarning {
    pub company: String,
    pub fund_count: usize,
    pub exposure: Decimal,
}

/// Sector → percent, serialized as a JSON object in first-appearance order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SectorPercentages(Vec<(String, Decimal)>);

impl SectorPercentages {
    pub fn get(&self, sector: &str) -> Option<Decimal> {
        self.0.iter().find(|(s, _)| s == sector).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|(s, v)| (s.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SectorPercentages {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (sector, percent) in &self.0 {
            map.serialize_entry(sector, percent)?;
        }
        map.end()
    }
}

/// Dashboard analysis
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicAnalysis {
    pub total_investment: Decimal,

    /// Sector shares (1 dp), largest first
    pub sector_distribution: Vec<SectorSlice>,

    /// Company shares (2 dp), largest first
    pub company_exposure: Vec<CompanyShare>,

    /// Sector shares (1 dp) in first-appearance order
    pub sector_exposure: SectorPercentages,

    pub overlap_warnings: Vec<OverlapWarning>,
    pub warnings: Vec<Warning>,
    pub risk_profile: RiskProfile,
}

impl BasicAnalysis {
    /// Zeroed analysis for a portfolio with nothing invested
    pub fn empty(risk_profile: RiskProfile) -> Self {
        Self {
            total_investment: Decimal::ZERO,
            sector_distribution: Vec::new(),
            company_exposure: Vec::new(),
            sector_exposure: SectorPercentages::default(),
            overlap_warnings: Vec::new(),
            warnings: Vec::new(),
            risk_profile,
        }
    }
}

/// Diversification result of a detailed analysis.
///
/// An empty portfolio reports a bare `0` on the wire rather than a score
/// object; existing clients rely on that shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ScoreOutcome {
    Unscored(u32),
    Scored(DiversificationScore),
}

impl ScoreOutcome {
    pub fn scored(&self) -> Option<&DiversificationScore> {
        match self {
            Self::Scored(score) => Some(score),
            Self::Unscored(_) => None,
        }
    }

    pub fn overall(&self) -> u32 {
        match self {
            Self::Scored(score) => score.overall,
            Self::Unscored(overall) => *overall,
        }
    }
}

/// Overlap and diversification report
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedAnalysis {
    pub total_funds: usize,
    pub total_investment: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_sectors: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_shares: Option<usize>,

    pub overlapping_shares: Vec<CompanyOverlap>,
    pub overlapping_sectors: Vec<SectorOverlap>,
    pub diversification_score: ScoreOutcome,
    pub potential_sectors: Vec<PotentialSector>,
    pub fund_recommendations: Vec<FundRecommendation>,
}

impl DetailedAnalysis {
    /// Report for a portfolio with nothing invested
    pub fn empty(total_funds: usize) -> Self {
        Self {
            total_funds,
            total_investment: Decimal::ZERO,
            unique_sectors: None,
            unique_shares: None,
            overlapping_shares: Vec::new(),
            overlapping_sectors: Vec::new(),
            diversification_score: ScoreOutcome::Unscored(0),
            potential_sectors: Vec::new(),
            fund_recommendations: Vec::new(),
        }
    }

    pub fn score(&self) -> Option<&DiversificationScore> {
        self.diversification_score.scored()
    }
}

/// Sector, company and overlap view of a portfolio with risk warnings.
///
/// Fails fast on malformed funds. A portfolio with no funds or nothing
/// invested yields [`BasicAnalysis::empty`].
pub fn analyze_portfolio(funds: &[FundHolding], risk_profile: RiskProfile) -> Result<BasicAnalysis> {
    let ledger = ExposureLedger::aggregate(funds)?;
    if ledger.is_empty() {
        return Ok(BasicAnalysis::empty(risk_profile));
    }

    let mut sector_distribution: Vec<SectorSlice> = ledger
        .sector_entries(SECTOR_DP)
        .into_iter()
        .map(|e| SectorSlice {
            name: e.key,
            value: e.percent_of_portfolio,
        })
        .collect();
    sector_distribution.sort_by(|a, b| b.value.cmp(&a.value));

    let mut company_exposure: Vec<CompanyShare> = ledger
        .company_entries(COMPANY_DP)
        .into_iter()
        .map(|e| CompanyShare {
            name: e.key,
            exposure: e.percent_of_portfolio,
        })
        .collect();
    company_exposure.sort_by(|a, b| b.exposure.cmp(&a.exposure));

    let sector_exposure = SectorPercentages(
        ledger
            .sector_entries(SECTOR_DP)
            .into_iter()
            .map(|e| (e.key, e.percent_of_portfolio))
            .collect(),
    );

    let overlaps = OverlapScan::scan(funds)?.company_overlaps();
    let warnings = generate_warnings(&ledger, &overlaps, risk_profile);
    let overlap_warnings = overlaps
        .into_iter()
        .map(|o| OverlapWarning {
            company: o.company,
            fund_count: o.number_of_funds,
            exposure: o.total_exposure_percent,
        })
        .collect();

    tracing::debug!(
        funds = funds.len(),
        warnings = warnings.len(),
        profile = %risk_profile,
        "basic analysis complete"
    );

    Ok(BasicAnalysis {
        total_investment: round_to(ledger.total_investment, COMPANY_DP),
        sector_distribution,
        company_exposure,
        sector_exposure,
        overlap_warnings,
        warnings,
        risk_profile,
    })
}

/// Overlapping shares and sectors, diversification score and sector gaps.
///
/// Fails fast on malformed funds. A portfolio with nothing invested yields
/// [`DetailedAnalysis::empty`].
pub fn analyze_portfolio_detailed(funds: &[FundHolding]) -> Result<DetailedAnalysis> {
    let ledger = ExposureLedger::aggregate(funds)?;
    if ledger.is_empty() {
        return Ok(DetailedAnalysis::empty(funds.len()));
    }

    let scan = OverlapScan::scan(funds)?;
    let score = DiversificationScore::compute(
        scan.unique_sectors(),
        scan.unique_companies(),
        ledger.sector_fractions(),
    );
    let potential = potential_sectors(scan.sector_names());
    let fund_recommendations = fund_recommendations(&potential);

    tracing::debug!(
        funds = funds.len(),
        score = score.overall,
        level = %score.level(),
        "detailed analysis complete"
    );

    Ok(DetailedAnalysis {
        total_funds: funds.len(),
        total_investment: round_to(ledger.total_investment, COMPANY_DP),
        unique_sectors: Some(scan.unique_sectors()),
        unique_shares: Some(scan.unique_companies()),
        overlapping_shares: scan.overlapping_companies(),
        overlapping_sectors: scan.overlapping_sectors(),
        diversification_score: ScoreOutcome::Scored(score),
        potential_sectors: potential,
        fund_recommendations,
    })
}
