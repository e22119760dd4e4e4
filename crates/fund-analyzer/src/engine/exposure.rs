//! Exposure Aggregator
//!
//! Turns per-fund weighted holdings into absolute rupee exposure per sector
//! and per company across the whole portfolio.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::{percent_of, round_to};
use crate::error::Result;
use crate::model::FundHolding;

/// Absolute exposures keyed by name, kept in order of first appearance
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExposureMap {
    entries: Vec<(String, Decimal)>,
    index: HashMap<String, usize>,
}

impl ExposureMap {
    /// Accumulate `value` under `key`; `None` when the sum overflows
    #[must_use]
    pub fn add(&mut self, key: &str, value: Decimal) -> Option<Decimal> {
        match self.index.get(key) {
            Some(&i) => {
                let sum = self.entries[i].1.checked_add(value)?;
                self.entries[i].1 = sum;
                Some(sum)
            }
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), value));
                Some(value)
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<Decimal> {
        self.index.get(key).map(|&i| self.entries[i].1)
    }

    /// Entries in first-appearance order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One derived exposure line
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExposureEntry {
    /// Sector or company name
    pub key: String,

    /// Rupee value across all funds
    pub absolute_value: Decimal,

    /// Share of total investment, rounded for display
    pub percent_of_portfolio: Decimal,
}

/// Portfolio-wide sector and company exposure
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExposureLedger {
    /// Sum of invested amounts over all funds
    pub total_investment: Decimal,

    /// Sector → absolute exposure
    pub sectors: ExposureMap,

    /// Company → absolute exposure
    pub companies: ExposureMap,
}

impl ExposureLedger {
    /// Aggregate a portfolio.
    ///
    /// Exposure is computed fund by fund and summed; percentages are only
    /// derived afterwards against `total_investment`. A portfolio whose
    /// total is zero yields empty maps. Amounts too large to sum are
    /// rejected as invalid funds.
    pub fn aggregate(funds: &[FundHolding]) -> Result<Self> {
        for fund in funds {
            fund.validate()?;
        }

        let total_investment = FundHolding::total_of(funds)?;
        let mut ledger = Self {
            total_investment,
            ..Default::default()
        };

        if total_investment.is_zero() {
            return Ok(ledger);
        }

        for fund in funds {
            for holding in &fund.holdings {
                let value = fund.exposure_of(holding)?;
                ledger
                    .sectors
                    .add(&holding.sector, value)
                    .ok_or_else(|| fund.out_of_range())?;
                ledger
                    .companies
                    .add(&holding.company, value)
                    .ok_or_else(|| fund.out_of_range())?;
            }
        }

        tracing::debug!(
            funds = funds.len(),
            sectors = ledger.sectors.len(),
            companies = ledger.companies.len(),
            total = %total_investment,
            "aggregated portfolio exposure"
        );

        Ok(ledger)
    }

    pub fn is_empty(&self) -> bool {
        self.total_investment.is_zero()
    }

    /// Unrounded share of the portfolio, in percent
    pub fn percent(&self, value: Decimal) -> Decimal {
        percent_of(value, self.total_investment)
    }

    /// Sector shares as fractions of total investment (not of 100)
    pub fn sector_fractions(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.sectors.iter().map(|(_, v)| v / self.total_investment)
    }

    /// Sector lines in first-appearance order, percentages rounded to `dp`
    pub fn sector_entries(&self, dp: u32) -> Vec<ExposureEntry> {
        self.entries(&self.sectors, dp)
    }

    /// Company lines in first-appearance order, percentages rounded to `dp`
    pub fn company_entries(&self, dp: u32) -> Vec<ExposureEntry> {
        self.entries(&self.companies, dp)
    }

    fn entries(&self, map: &ExposureMap, dp: u32) -> Vec<ExposureEntry> {
        map.iter()
            .map(|(key, value)| ExposureEntry {
                key: key.to_string(),
                absolute_value: value,
                percent_of_portfolio: round_to(self.percent(value), dp),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Holding;
    use rust_decimal_macros::dec;

    fn funds() -> Vec<FundHolding> {
        vec![
            FundHolding::new(
                "Large Cap",
                dec!(60000),
                vec![
                    Holding::new("HDFC Bank", "Banking", dec!(50)),
                    Holding::new("TCS", "IT", dec!(50)),
                ],
            ),
            FundHolding::new(
                "Flexi Cap",
                dec!(40000),
                vec![
                    Holding::new("HDFC Bank", "Banking", dec!(25)),
                    Holding::new("Reliance Industries", "Energy", dec!(75)),
                ],
            ),
        ]
    }

    #[test]
    fn test_aggregate_sums_across_funds() {
        let ledger = ExposureLedger::aggregate(&funds()).unwrap();
        assert_eq!(ledger.total_investment, dec!(100000));
        assert_eq!(ledger.sectors.get("Banking"), Some(dec!(40000)));
        assert_eq!(ledger.companies.get("HDFC Bank"), Some(dec!(40000)));
        assert_eq!(ledger.companies.get("Reliance Industries"), Some(dec!(30000)));
    }

    #[test]
    fn test_sector_and_company_totals_conserve_investment() {
        let ledger = ExposureLedger::aggregate(&funds()).unwrap();
        let sectors: Decimal = ledger.sectors.iter().map(|(_, v)| v).sum();
        let companies: Decimal = ledger.companies.iter().map(|(_, v)| v).sum();
        assert_eq!(sectors, ledger.total_investment);
        assert_eq!(companies, ledger.total_investment);
    }

    #[test]
    fn test_first_appearance_order() {
        let ledger = ExposureLedger::aggregate(&funds()).unwrap();
        let sectors: Vec<_> = ledger.sectors.iter().map(|(k, _)| k).collect();
        assert_eq!(sectors, vec!["Banking", "IT", "Energy"]);
    }

    #[test]
    fn test_partial_weights_are_not_normalized() {
        let funds = vec![FundHolding::new(
            "Top Ten",
            dec!(10000),
            vec![Holding::new("Infosys", "IT", dec!(6.5))],
        )];
        let ledger = ExposureLedger::aggregate(&funds).unwrap();
        let entries = ledger.sector_entries(2);
        assert_eq!(entries[0].absolute_value, dec!(650));
        assert_eq!(entries[0].percent_of_portfolio, dec!(6.5));
    }

    #[test]
    fn test_zero_investment_yields_empty_maps() {
        let funds = vec![FundHolding::new(
            "Unfunded",
            Decimal::ZERO,
            vec![Holding::new("TCS", "IT", dec!(10))],
        )];
        let ledger = ExposureLedger::aggregate(&funds).unwrap();
        assert!(ledger.is_empty());
        assert!(ledger.sectors.is_empty());
        assert!(ledger.company_entries(2).is_empty());
    }

    #[test]
    fn test_oversized_amounts_are_rejected() {
        let big = dec!(50000000000000000000000000000);
        let funds = vec![
            FundHolding::new("A", big, vec![Holding::new("TCS", "IT", dec!(10))]),
            FundHolding::new("B", big, vec![Holding::new("TCS", "IT", dec!(10))]),
        ];
        let err = ExposureLedger::aggregate(&funds).unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(err.to_string(), "Invalid fund 'B': amount out of range");
    }

    #[test]
    fn test_overflowing_sector_sum_is_rejected() {
        // each weight is valid, but the fund's sector total exceeds Decimal::MAX
        let big = dec!(50000000000000000000000000000);
        let funds = vec![FundHolding::new(
            "Stacked",
            big,
            vec![
                Holding::new("HDFC Bank", "Banking", dec!(100)),
                Holding::new("ICICI Bank", "Banking", dec!(100)),
            ],
        )];
        assert!(matches!(
            ExposureLedger::aggregate(&funds),
            Err(crate::error::AnalyzerError::InvalidFund { .. })
        ));
    }

    #[test]
    fn test_invalid_fund_fails_fast() {
        let mut funds = funds();
        funds[1].holdings[0].weight = dec!(-3);
        assert!(ExposureLedger::aggregate(&funds).is_err());
    }
}
