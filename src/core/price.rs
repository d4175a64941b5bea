//! Pricing abstractions and the synthetic market-price generator

use crate::core::catalog::FundCatalog;
use crate::core::rounding::round_to;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Price of one unit of anything without a registered base price.
pub const UNIT_PRICE: f64 = 1.0;

/// Decimal places kept on every synthetic quote.
pub const QUOTE_DECIMALS: i32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub fund_id: String,
    pub price: f64,
    pub as_of: DateTime<Utc>,
}

impl PriceQuote {
    pub fn new(fund_id: &str, price: f64) -> Self {
        Self {
            fund_id: fund_id.to_string(),
            price,
            as_of: Utc::now(),
        }
    }
}

/// Source of current prices. Quoting never fails: funds without a
/// registered base price are always worth [`UNIT_PRICE`].
pub trait PriceOracle: Send + Sync {
    fn quote(&self, fund_id: &str) -> PriceQuote;
}

/// Inclusive bounds of the relative perturbation applied to a base price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftRange {
    pub min: f64,
    pub max: f64,
}

impl Default for DriftRange {
    fn default() -> Self {
        Self {
            min: -0.015,
            max: 0.05,
        }
    }
}

/// Quotes every registered fund at `base * (1 + f)` with `f` drawn
/// uniformly from the drift range on each call.
pub struct SyntheticPriceOracle<R = StdRng> {
    base_prices: HashMap<String, f64>,
    drift: DriftRange,
    rng: Mutex<R>,
}

impl SyntheticPriceOracle<StdRng> {
    pub fn new(catalog: &FundCatalog, drift: DriftRange) -> Self {
        Self::with_rng(catalog, drift, StdRng::from_entropy())
    }

    /// Produces the same quote sequence for the same seed.
    pub fn seeded(catalog: &FundCatalog, drift: DriftRange, seed: u64) -> Self {
        Self::with_rng(catalog, drift, StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore + Send> SyntheticPriceOracle<R> {
    pub fn with_rng(catalog: &FundCatalog, drift: DriftRange, rng: R) -> Self {
        let base_prices = catalog
            .base_prices()
            .map(|(id, price)| (id.to_string(), price))
            .collect();
        Self {
            base_prices,
            drift,
            rng: Mutex::new(rng),
        }
    }

    pub fn base_price(&self, fund_id: &str) -> Option<f64> {
        self.base_prices.get(fund_id).copied()
    }
}

impl<R: RngCore + Send> PriceOracle for SyntheticPriceOracle<R> {
    fn quote(&self, fund_id: &str) -> PriceQuote {
        let Some(base) = self.base_price(fund_id) else {
            return PriceQuote::new(fund_id, UNIT_PRICE);
        };

        let factor = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            rng.gen_range(self.drift.min..=self.drift.max)
        };
        let price = round_to(base * (1.0 + factor), QUOTE_DECIMALS);
        debug!(fund_id, base, factor, price, "Synthetic quote");
        PriceQuote::new(fund_id, price)
    }
}

/// Oracle with pinned prices; anything not pinned quotes at [`UNIT_PRICE`].
#[derive(Debug, Clone, Default)]
pub struct FixedPriceOracle {
    prices: HashMap<String, f64>,
}

impl FixedPriceOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, fund_id: &str, price: f64) -> Self {
        self.prices.insert(fund_id.to_string(), price);
        self
    }
}

impl PriceOracle for FixedPriceOracle {
    fn quote(&self, fund_id: &str) -> PriceQuote {
        let price = self.prices.get(fund_id).copied().unwrap_or(UNIT_PRICE);
        PriceQuote::new(fund_id, price)
    }
}
