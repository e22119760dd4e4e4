//! Holdings Sources
//!
//! Where fund holdings come from. The engine only ever sees the resulting
//! [`FundHolding`] records; any feed (broker API, database, static catalog)
//! plugs in behind [`HoldingsSource`].

mod catalog;

pub use catalog::{CATALOG_FUNDS, CatalogHoldingsSource};

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::model::{FundHolding, Holding};

/// Supplier of top holdings per fund (Strategy pattern)
#[async_trait]
pub trait HoldingsSource: Send + Sync {
    /// Holdings for a fund, in feed order
    async fn holdings_for(&self, fund_name: &str) -> Result<Vec<Holding>>;

    /// Source name for logs and health output
    fn name(&self) -> &str;
}

impl FundHolding {
    /// Resolve a fund's holdings through `source` and validate the record
    pub async fn from_source(
        name: &str,
        amount: Decimal,
        source: &dyn HoldingsSource,
    ) -> Result<Self> {
        let holdings = source.holdings_for(name).await?;
        let fund = Self::new(name, amount, holdings);
        fund.validate()?;

        tracing::debug!(
            fund = %fund.name,
            source = source.name(),
            holdings = fund.holdings.len(),
            "resolved fund holdings"
        );

        Ok(fund)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyzerError;
    use rust_decimal_macros::dec;

    struct FixedSource(Vec<Holding>);

    #[async_trait]
    impl HoldingsSource for FixedSource {
        async fn holdings_for(&self, _fund_name: &str) -> Result<Vec<Holding>> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_from_source_builds_fund() {
        let source = FixedSource(vec![Holding::new("TCS", "IT", dec!(9.5))]);
        let fund = FundHolding::from_source("Tech Fund", dec!(25000), &source).await.unwrap();
        assert_eq!(fund.name, "Tech Fund");
        assert_eq!(fund.holdings.len(), 1);
    }

    #[tokio::test]
    async fn test_from_source_validates() {
        let source = FixedSource(vec![Holding::new("TCS", "IT", dec!(140))]);
        let err = FundHolding::from_source("Tech Fund", dec!(25000), &source)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::WeightOutOfRange { .. }));

        let ok_source = FixedSource(Vec::new());
        assert!(FundHolding::from_source("Tech Fund", dec!(-5), &ok_source).await.is_err());
    }
}
