//! Portfolio valuation reports.
//!
//! Investment holdings are repriced through the oracle on every call, so two
//! reports for an unchanged portfolio can differ in their currency amounts.
//! Unit counts and donation amounts are stable.
use crate::core::catalog::{FundCatalog, FundKind};
use crate::core::portfolio::Portfolio;
use crate::core::price::PriceOracle;
use crate::core::rounding::round_to;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const AMOUNT_DECIMALS: i32 = 2;
pub const UNIT_DECIMALS: i32 = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentLine {
    #[serde(rename = "fundId")]
    pub fund_id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    pub amount: f64,
    pub units: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationLine {
    #[serde(rename = "fundId")]
    pub fund_id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    pub amount: f64,
}

/// Valuation summary of one user's portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioReport {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "totalGeneral")]
    pub total: f64,
    #[serde(rename = "totalInvertido")]
    pub total_invested: f64,
    #[serde(rename = "totalDonado")]
    pub total_donated: f64,
    #[serde(rename = "inversiones")]
    pub investments: Vec<InvestmentLine>,
    #[serde(rename = "donaciones")]
    pub donations: Vec<DonationLine>,
}

impl PortfolioReport {
    /// Report for a user without holdings.
    pub fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            total: 0.0,
            total_invested: 0.0,
            total_donated: 0.0,
            investments: Vec::new(),
            donations: Vec::new(),
        }
    }
}

/// Values every holding of `portfolio` in insertion order.
///
/// A missing portfolio yields [`PortfolioReport::empty`]. Holdings whose
/// fund is no longer in the catalog are skipped.
pub fn build_report(
    user_id: &str,
    portfolio: Option<&Portfolio>,
    catalog: &FundCatalog,
    oracle: &(dyn PriceOracle + Send + Sync),
) -> PortfolioReport {
    let mut report = PortfolioReport::empty(user_id);
    let Some(portfolio) = portfolio else {
        debug!(user_id, "No portfolio, returning empty report");
        return report;
    };

    let mut invested = 0.0;
    let mut donated = 0.0;

    for holding in portfolio.holdings() {
        let Some(fund) = catalog.get(&holding.fund_id) else {
            warn!(user_id, fund_id = %holding.fund_id, "Skipping holding of unknown fund");
            continue;
        };

        match fund.kind {
            FundKind::Investment => {
                let price = oracle.quote(&fund.id).price;
                let value = holding.quantity * price;
                invested += value;
                report.investments.push(InvestmentLine {
                    fund_id: fund.id.clone(),
                    name: fund.name.clone(),
                    amount: round_to(value, AMOUNT_DECIMALS),
                    units: round_to(holding.quantity, UNIT_DECIMALS),
                });
            }
            FundKind::Donation => {
                donated += holding.quantity;
                report.donations.push(DonationLine {
                    fund_id: fund.id.clone(),
                    name: fund.name.clone(),
                    amount: round_to(holding.quantity, AMOUNT_DECIMALS),
                });
            }
        }
    }

    report.total_invested = round_to(invested, AMOUNT_DECIMALS);
    report.total_donated = round_to(donated, AMOUNT_DECIMALS);
    report.total = round_to(invested + donated, AMOUNT_DECIMALS);
    debug!(user_id, total = report.total, "Built portfolio report");
    report
}
