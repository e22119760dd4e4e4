//! Analysis Engine
//!
//! Pure computations over one portfolio snapshot. Nothing here keeps state
//! between calls, so analyses for different investors can run in parallel.

mod exposure;
mod overlap;
mod scoring;
mod sectors;
mod warnings;

pub use exposure::{ExposureEntry, ExposureLedger, ExposureMap};
pub use overlap::{CompanyOverlap, FundOccurrence, OverlapScan, SectorOverlap};
pub use scoring::{Assessment, AssessmentLevel, DiversificationScore};
pub use sectors::{
    COMMON_SECTORS, FundRecommendation, PotentialSector, expected_characteristics, fund_type_for,
    fund_recommendations, potential_sectors,
};
pub use warnings::{Warning, WarningKind, generate_warnings};

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Share of `total` taken by `value`, in percent (0 when `total` is 0)
pub(crate) fn percent_of(value: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    value / total * dec!(100)
}

/// Round half away from zero to `dp` places and drop trailing zeros
pub(crate) fn round_to(value: Decimal, dp: u32) -> Decimal {
    value
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// Render with exactly `dp` decimals, half away from zero ("35.0", "30.0")
pub(crate) fn fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_of_zero_total() {
        assert_eq!(percent_of(dec!(10), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_round_to_half_away_from_zero() {
        assert_eq!(round_to(dec!(12.345), 2), dec!(12.35));
        assert_eq!(round_to(dec!(12.5), 0), dec!(13));
        assert_eq!(round_to(dec!(30.00), 1).to_string(), "30");
    }

    #[test]
    fn test_fixed_keeps_trailing_zero() {
        assert_eq!(fixed(dec!(35), 1), "35.0");
        assert_eq!(fixed(dec!(30.05), 1), "30.1");
        assert_eq!(fixed(dec!(12.3456), 2), "12.35");
    }
}
