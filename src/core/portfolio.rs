//! Per-user holdings and the store abstraction that owns them

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Quantity held in one fund: units for investments, cash for donations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub fund_id: String,
    pub quantity: f64,
}

/// All holdings of one user, in the order they were first deposited into.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub user_id: String,
    holdings: IndexMap<String, f64>,
}

impl Portfolio {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            holdings: IndexMap::new(),
        }
    }

    /// Adds `quantity` to the holding, creating it at zero first if needed.
    /// Returns the new quantity.
    pub fn credit(&mut self, fund_id: &str, quantity: f64) -> f64 {
        let held = self.holdings.entry(fund_id.to_string()).or_insert(0.0);
        *held += quantity;
        *held
    }

    pub fn quantity(&self, fund_id: &str) -> Option<f64> {
        self.holdings.get(fund_id).copied()
    }

    pub fn holdings(&self) -> impl Iterator<Item = Holding> + '_ {
        self.holdings.iter().map(|(fund_id, quantity)| Holding {
            fund_id: fund_id.clone(),
            quantity: *quantity,
        })
    }
}

/// Owner of every user's portfolio. Implementations must apply each
/// `credit` atomically so concurrent deposits never lose updates.
#[async_trait]
pub trait PortfolioStore: Send + Sync {
    /// Adds `quantity` to the user's holding in `fund_id`, creating the
    /// portfolio and holding on first use. Returns the new quantity.
    async fn credit(&self, user_id: &str, fund_id: &str, quantity: f64) -> f64;

    /// Point-in-time copy of the user's portfolio, `None` if the user has
    /// never deposited.
    async fn snapshot(&self, user_id: &str) -> Option<Portfolio>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_accumulates_in_insertion_order() {
        let mut portfolio = Portfolio::new("u1");
        assert_eq!(portfolio.holdings().count(), 0);

        portfolio.credit("fondo-003", 5.0);
        portfolio.credit("fondo-001", 10.0);
        assert_eq!(portfolio.credit("fondo-003", 2.5), 7.5);

        let order: Vec<String> = portfolio.holdings().map(|h| h.fund_id).collect();
        assert_eq!(order, vec!["fondo-003", "fondo-001"]);
        assert_eq!(portfolio.quantity("fondo-001"), Some(10.0));
        assert_eq!(portfolio.quantity("fondo-002"), None);
        assert_eq!(portfolio.holdings().count(), 2);
    }

    #[test]
    fn test_zero_credit_keeps_holding() {
        let mut portfolio = Portfolio::new("u1");
        portfolio.credit("fondo-001", 0.0);
        assert_eq!(portfolio.quantity("fondo-001"), Some(0.0));
    }
}
