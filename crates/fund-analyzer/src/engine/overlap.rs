//! Overlap Detector
//!
//! Finds companies and sectors held through more than one fund.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::{percent_of, round_to};
use crate::error::Result;
use crate::model::FundHolding;

/// One appearance of a company inside a fund
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundOccurrence {
    pub fund_name: String,
    pub weight: Decimal,
    /// Rupee exposure through this fund
    pub exposure: Decimal,
}

/// A company present in two or more funds
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyOverlap {
    pub company: String,

    /// Distinct funds holding the company
    pub number_of_funds: usize,

    /// Distinct fund names, first occurrence first
    pub funds: Vec<String>,

    /// Combined exposure as a share of the portfolio (2 dp)
    pub total_exposure_percent: Decimal,

    /// Mean weight over every occurrence (2 dp)
    pub average_weight: Decimal,

    /// Every occurrence, in holding order
    pub fund_details: Vec<FundOccurrence>,
}

/// A sector present in two or more funds
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorOverlap {
    pub sector: String,
    pub number_of_funds: usize,
    pub funds: Vec<String>,
    pub total_exposure_percent: Decimal,
}

#[derive(Clone, Debug)]
struct CompanyTally {
    company: String,
    funds: Vec<String>,
    occurrences: Vec<FundOccurrence>,
    total_weight: Decimal,
    total_exposure: Decimal,
}

impl CompanyTally {
    fn new(company: &str) -> Self {
        Self {
            company: company.to_string(),
            funds: Vec::new(),
            occurrences: Vec::new(),
            total_weight: Decimal::ZERO,
            total_exposure: Decimal::ZERO,
        }
    }
}

#[derive(Clone, Debug)]
struct SectorTally {
    sector: String,
    funds: Vec<String>,
    total_exposure: Decimal,
}

impl SectorTally {
    fn new(sector: &str) -> Self {
        Self {
            sector: sector.to_string(),
            funds: Vec::new(),
            total_exposure: Decimal::ZERO,
        }
    }
}

fn note_fund(funds: &mut Vec<String>, name: &str) {
    if !funds.iter().any(|f| f == name) {
        funds.push(name.to_string());
    }
}

/// Slot of `key` in `tallies`, appending a fresh tally on first sight
fn slot<T>(
    tallies: &mut Vec<T>,
    index: &mut HashMap<String, usize>,
    key: &str,
    fresh: impl FnOnce(&str) -> T,
) -> usize {
    if let Some(&i) = index.get(key) {
        return i;
    }
    tallies.push(fresh(key));
    index.insert(key.to_string(), tallies.len() - 1);
    tallies.len() - 1
}

/// Per-entity accumulation over a whole portfolio.
///
/// Built in one pass; the "more than one fund" filter is applied only
/// afterwards, never while scanning.
#[derive(Clone, Debug, Default)]
pub struct OverlapScan {
    companies: Vec<CompanyTally>,
    company_index: HashMap<String, usize>,
    sectors: Vec<SectorTally>,
    sector_index: HashMap<String, usize>,
    total_investment: Decimal,
}

impl OverlapScan {
    /// Scan validated funds; amounts too large to sum are an invalid fund
    pub fn scan(funds: &[FundHolding]) -> Result<Self> {
        let mut scan = Self {
            total_investment: FundHolding::total_of(funds)?,
            ..Default::default()
        };

        for fund in funds {
            for holding in &fund.holdings {
                let exposure = fund.exposure_of(holding)?;

                let i = slot(
                    &mut scan.companies,
                    &mut scan.company_index,
                    &holding.company,
                    CompanyTally::new,
                );
                let company = &mut scan.companies[i];
                note_fund(&mut company.funds, &fund.name);
                company.occurrences.push(FundOccurrence {
                    fund_name: fund.name.clone(),
                    weight: holding.weight,
                    exposure,
                });
                company.total_weight += holding.weight;
                company.total_exposure = company
                    .total_exposure
                    .checked_add(exposure)
                    .ok_or_else(|| fund.out_of_range())?;

                let i = slot(
                    &mut scan.sectors,
                    &mut scan.sector_index,
                    &holding.sector,
                    SectorTally::new,
                );
                let sector = &mut scan.sectors[i];
                // a fund counts once per sector however many holdings share it
                note_fund(&mut sector.funds, &fund.name);
                sector.total_exposure = sector
                    .total_exposure
                    .checked_add(exposure)
                    .ok_or_else(|| fund.out_of_range())?;
            }
        }

        Ok(scan)
    }

    pub fn unique_companies(&self) -> usize {
        self.companies.len()
    }

    pub fn unique_sectors(&self) -> usize {
        self.sectors.len()
    }

    /// Sector names in first-appearance order
    pub fn sector_names(&self) -> impl Iterator<Item = &str> {
        self.sectors.iter().map(|s| s.sector.as_str())
    }

    /// Overlapping companies in first-appearance order
    pub fn company_overlaps(&self) -> Vec<CompanyOverlap> {
        self.companies
            .iter()
            .filter(|c| c.funds.len() > 1)
            .map(|c| {
                let occurrences = Decimal::from(c.occurrences.len());
                CompanyOverlap {
                    company: c.company.clone(),
                    number_of_funds: c.funds.len(),
                    funds: c.funds.clone(),
                    total_exposure_percent: round_to(
                        percent_of(c.total_exposure, self.total_investment),
                        2,
                    ),
                    average_weight: round_to(c.total_weight / occurrences, 2),
                    fund_details: c.occurrences.clone(),
                }
            })
            .collect()
    }

    /// Overlapping sectors in first-appearance order
    pub fn sector_overlaps(&self) -> Vec<SectorOverlap> {
        self.sectors
            .iter()
            .filter(|s| s.funds.len() > 1)
            .map(|s| SectorOverlap {
                sector: s.sector.clone(),
                number_of_funds: s.funds.len(),
                funds: s.funds.clone(),
                total_exposure_percent: round_to(
                    percent_of(s.total_exposure, self.total_investment),
                    2,
                ),
            })
            .collect()
    }

    /// Overlapping companies, most widely held first (ties keep first-appearance order)
    pub fn overlapping_companies(&self) -> Vec<CompanyOverlap> {
        let mut overlaps = self.company_overlaps();
        overlaps.sort_by(|a, b| b.number_of_funds.cmp(&a.number_of_funds));
        overlaps
    }

    /// Overlapping sectors, most widely held first (ties keep first-appearance order)
    pub fn overlapping_sectors(&self) -> Vec<SectorOverlap> {
        let mut overlaps = self.sector_overlaps();
        overlaps.sort_by(|a, b| b.number_of_funds.cmp(&a.number_of_funds));
        overlaps
    }
}
