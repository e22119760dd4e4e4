//! Catalog Holdings Source
//!
//! Static top-ten holdings for well-known funds. Unlisted funds get a
//! synthesized, but stable, holdings list unless the source is strict.

use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::HoldingsSource;
use crate::error::{AnalyzerError, Result};
use crate::model::Holding;

type Row = (&'static str, &'static str, Decimal);

const AXIS_BLUECHIP: &[Row] = &[
    ("Reliance Industries", "Energy", dec!(8.2)),
    ("HDFC Bank", "Banking", dec!(7.8)),
    ("Infosys", "IT", dec!(6.5)),
    ("ICICI Bank", "Banking", dec!(5.9)),
    ("TCS", "IT", dec!(5.4)),
    ("Bharti Airtel", "Telecom", dec!(4.8)),
    ("HUL", "FMCG", dec!(4.2)),
    ("ITC", "FMCG", dec!(3.9)),
    ("Larsen & Toubro", "Engineering", dec!(3.5)),
    ("Kotak Bank", "Banking", dec!(3.2)),
];

const HDFC_MID_CAP: &[Row] = &[
    ("Avenue Supermarts", "Retail", dec!(6.8)),
    ("PI Industries", "Agro Chemicals", dec!(5.9)),
    ("Coforge", "IT", dec!(5.4)),
    ("Tata Consumer", "FMCG", dec!(5.1)),
    ("Jubilant FoodWorks", "Food Service", dec!(4.8)),
    ("Muthoot Finance", "NBFC", dec!(4.5)),
    ("Cholamandalam Investment", "Finance", dec!(4.2)),
    ("Tata Elxsi", "IT", dec!(3.9)),
    ("Godrej Consumer", "FMCG", dec!(3.6)),
    ("Aubank", "NBFC", dec!(3.3)),
];

const SBI_SMALL_CAP: &[Row] = &[
    ("Solar Industries", "Defense", dec!(5.2)),
    ("Fine Organic", "Chemicals", dec!(4.8)),
    ("Capri Global", "NBFC", dec!(4.5)),
    ("Ratnamani Metals", "Metals", dec!(4.2)),
    ("Kirloskar Oil Engines", "Engineering", dec!(3.9)),
    ("Shakti Pumps", "Industrial", dec!(3.6)),
    ("Vardhman Textiles", "Textiles", dec!(3.3)),
    ("Time Technoplast", "Packaging", dec!(3.0)),
    ("Jindal Steel", "Steel", dec!(2.8)),
    ("Apar Industries", "Energy", dec!(2.5)),
];

const MIRAE_LARGE_CAP: &[Row] = &[
    ("Reliance Industries", "Energy", dec!(9.1)),
    ("TCS", "IT", dec!(8.3)),
    ("HDFC Bank", "Banking", dec!(7.8)),
    ("Infosys", "IT", dec!(6.9)),
    ("ICICI Bank", "Banking", dec!(6.2)),
    ("HUL", "FMCG", dec!(5.4)),
    ("Bharti Airtel", "Telecom", dec!(4.8)),
    ("Kotak Bank", "Banking", dec!(4.1)),
    ("ITC", "FMCG", dec!(3.7)),
    ("Larsen & Toubro", "Engineering", dec!(3.3)),
];

const PARAG_PARIKH_FLEXI_CAP: &[Row] = &[
    ("HDFC Bank", "Banking", dec!(8.5)),
    ("Reliance Industries", "Energy", dec!(7.2)),
    ("Infosys", "IT", dec!(6.8)),
    ("TCS", "IT", dec!(5.9)),
    ("ICICI Bank", "Banking", dec!(5.3)),
    ("HUL", "FMCG", dec!(4.8)),
    ("Bharti Airtel", "Telecom", dec!(4.2)),
    ("Kotak Bank", "Banking", dec!(3.7)),
    ("ITC", "FMCG", dec!(3.4)),
    ("Larsen & Toubro", "Engineering", dec!(3.0)),
];

/// Sector universe for synthesized funds, in allocation order
const UNIVERSE: &[(&str, &[&str])] = &[
    ("Banking", &["HDFC Bank", "ICICI Bank", "Kotak Bank", "SBI", "Axis Bank"]),
    ("IT", &["TCS", "Infosys", "Wipro", "HCL Tech", "Tech Mahindra"]),
    ("Energy", &["Reliance Industries", "ONGC", "NTPC", "Power Grid", "Coal India"]),
    ("FMCG", &["HUL", "ITC", "Godrej Consumer", "Dabur", "Marico"]),
    ("Telecom", &["Bharti Airtel", "Reliance Jio", "Vodafone Idea"]),
    ("Engineering", &["Larsen & Toubro", "BHEL", "Siemens", "ABB"]),
    ("Pharma", &["Sun Pharma", "Dr Reddy", "Cipla", "Lupin", "Biocon"]),
    ("Chemicals", &["UPL", "PI Industries", "Deepak Nitrite", "Aarti Industries"]),
];

const TOP_N: usize = 10;

/// Funds the catalog knows by name
pub const CATALOG_FUNDS: [&str; 5] = [
    "Axis Bluechip Fund",
    "HDFC Mid-Cap Opportunities",
    "SBI Small Cap Fund",
    "Mirae Asset Large Cap Fund",
    "Parag Parikh Flexi Cap Fund",
];

/// Holdings source backed by a fixed catalog
#[derive(Clone, Debug, Default)]
pub struct CatalogHoldingsSource {
    strict: bool,
}

impl CatalogHoldingsSource {
    /// Catalog that synthesizes holdings for unlisted funds
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog that rejects unlisted funds with [`AnalyzerError::UnknownFund`]
    pub fn strict() -> Self {
        Self { strict: true }
    }

    fn listed(fund_name: &str) -> Option<&'static [Row]> {
        match fund_name.trim() {
            "Axis Bluechip Fund" => Some(AXIS_BLUECHIP),
            "HDFC Mid-Cap Opportunities" => Some(HDFC_MID_CAP),
            "SBI Small Cap Fund" => Some(SBI_SMALL_CAP),
            "Mirae Asset Large Cap Fund" => Some(MIRAE_LARGE_CAP),
            "Parag Parikh Flexi Cap Fund" => Some(PARAG_PARIKH_FLEXI_CAP),
            _ => None,
        }
    }
}

#[async_trait]
impl HoldingsSource for CatalogHoldingsSource {
    async fn holdings_for(&self, fund_name: &str) -> Result<Vec<Holding>> {
        if let Some(rows) = Self::listed(fund_name) {
            return Ok(rows
                .iter()
                .map(|(company, sector, weight)| Holding::new(*company, *sector, *weight))
                .collect());
        }

        if self.strict {
            return Err(AnalyzerError::UnknownFund(fund_name.to_string()));
        }

        tracing::debug!(fund = fund_name, "fund not in catalog, synthesizing holdings");
        Ok(synthesize(fund_name))
    }

    fn name(&self) -> &str {
        "catalog"
    }
}

/// FNV-1a of the fund name, so a name always seeds the same stream
fn name_seed(name: &str) -> u64 {
    name.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

/// Stable top-ten holdings for a fund the catalog does not list.
///
/// Walks the sector universe taking one to three companies per sector
/// until 100% is allocated; total weight never exceeds 100.
fn synthesize(fund_name: &str) -> Vec<Holding> {
    let mut rng = ChaCha8Rng::seed_from_u64(name_seed(fund_name));
    let mut remaining = dec!(100);
    let mut holdings = Vec::new();

    for (sector, companies) in UNIVERSE {
        if remaining <= Decimal::ZERO {
            break;
        }

        let picks = rng.gen_range(1..=3).min(companies.len());
        for _ in 0..picks {
            if remaining <= Decimal::ZERO {
                break;
            }
            // two decimals in [2.00, 12.00)
            let weight = Decimal::new(rng.gen_range(200..1200), 2).min(remaining);
            let company = companies[rng.gen_range(0..companies.len())];
            holdings.push(Holding::new(company, *sector, weight));
            remaining -= weight;
        }
    }

    holdings.truncate(TOP_N);
    holdings
}
