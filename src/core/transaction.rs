//! Deposit validation and application

use crate::core::catalog::{FundCatalog, FundKind};
use crate::core::error::{Error, Result};
use crate::core::portfolio::PortfolioStore;
use crate::core::price::PriceOracle;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// A deposit as submitted by a caller. Every field may be absent; presence
/// is checked by [`DepositRequest::validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRequest {
    pub user_id: Option<String>,
    pub fund_id: Option<String>,
    pub amount: Option<f64>,
}

impl DepositRequest {
    pub fn new(user_id: &str, fund_id: &str, amount: f64) -> Self {
        Self {
            user_id: Some(user_id.to_string()),
            fund_id: Some(fund_id.to_string()),
            amount: Some(amount),
        }
    }

    /// Rejects absent or empty fields. A zero amount counts as absent.
    pub fn validate(&self) -> Result<Deposit<'_>> {
        match (
            self.user_id.as_deref(),
            self.fund_id.as_deref(),
            self.amount,
        ) {
            (Some(user_id), Some(fund_id), Some(amount))
                if !user_id.is_empty() && !fund_id.is_empty() && amount != 0.0 =>
            {
                Ok(Deposit {
                    user_id,
                    fund_id,
                    amount,
                })
            }
            _ => Err(Error::missing_fields()),
        }
    }
}

/// A deposit whose required fields are all present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deposit<'a> {
    pub user_id: &'a str,
    pub fund_id: &'a str,
    pub amount: f64,
}

/// Confirmation returned for every applied deposit.
pub const RECEIPT_MESSAGE: &str = "Inversión registrada con éxito";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositReceipt {
    pub message: String,
}

/// Validates `request` and credits the user's holding.
///
/// Investment deposits buy `amount / price` units at a fresh quote; donation
/// deposits add `amount` as cash. Nothing is mutated unless every check
/// passes, and repeated identical requests apply repeatedly.
pub async fn apply_deposit(
    catalog: &FundCatalog,
    oracle: &(dyn PriceOracle + Send + Sync),
    store: &(dyn PortfolioStore + Send + Sync),
    request: &DepositRequest,
) -> Result<DepositReceipt> {
    let deposit = request.validate()?;
    let fund = catalog
        .get(deposit.fund_id)
        .ok_or_else(|| Error::fund_not_found(deposit.fund_id))?;

    if !deposit.amount.is_finite() || deposit.amount < 0.0 {
        return Err(Error::Validation(format!(
            "amount must be a positive number, got {}",
            deposit.amount
        )));
    }

    let quantity = match fund.kind {
        FundKind::Investment => {
            let quote = oracle.quote(&fund.id);
            if !quote.price.is_finite() || quote.price <= 0.0 {
                warn!(
                    fund_id = %fund.id,
                    price = quote.price,
                    "Refusing to buy at unusable price"
                );
                return Err(Error::Validation(format!(
                    "fund {} has no usable price: {}",
                    fund.id, quote.price
                )));
            }
            debug!(fund_id = %fund.id, price = quote.price, "Buying units");
            deposit.amount / quote.price
        }
        FundKind::Donation => deposit.amount,
    };

    let held = store.credit(deposit.user_id, &fund.id, quantity).await;
    info!(
        user_id = deposit.user_id,
        fund_id = %fund.id,
        amount = deposit.amount,
        quantity,
        held,
        "Deposit applied"
    );

    Ok(DepositReceipt {
        message: RECEIPT_MESSAGE.to_string(),
    })
}
