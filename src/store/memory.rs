use crate::core::portfolio::{Portfolio, PortfolioStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory portfolio store. A single lock serializes every credit, so the
/// read-modify-write on a holding is atomic across tasks.
#[derive(Clone, Default)]
pub struct MemoryPortfolioStore {
    inner: Arc<Mutex<HashMap<String, Portfolio>>>,
}

impl MemoryPortfolioStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PortfolioStore for MemoryPortfolioStore {
    async fn credit(&self, user_id: &str, fund_id: &str, quantity: f64) -> f64 {
        let mut portfolios = self.inner.lock().await;
        let portfolio = portfolios.entry(user_id.to_string()).or_insert_with(|| {
            debug!(user_id, "Creating portfolio");
            Portfolio::new(user_id)
        });
        let held = portfolio.credit(fund_id, quantity);
        debug!(user_id, fund_id, quantity, held, "Store CREDIT");
        held
    }

    async fn snapshot(&self, user_id: &str) -> Option<Portfolio> {
        let portfolios = self.inner.lock().await;
        let portfolio = portfolios.get(user_id).cloned();
        if portfolio.is_some() {
            debug!(user_id, "Store HIT");
        } else {
            debug!(user_id, "Store MISS");
        }
        portfolio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_snapshot_of_unknown_user_is_none() {
        let store = MemoryPortfolioStore::new();
        assert!(store.snapshot("nobody").await.is_none());
        // A miss does not create the portfolio.
        assert!(store.snapshot("nobody").await.is_none());
    }

    #[tokio::test]
    async fn test_credit_creates_and_accumulates() {
        let store = MemoryPortfolioStore::new();

        assert_eq!(store.credit("u1", "fondo-001", 10.0).await, 10.0);
        assert_eq!(store.credit("u1", "fondo-001", 2.5).await, 12.5);
        store.credit("u2", "fondo-003", 1.0).await;

        let portfolio = store.snapshot("u1").await.unwrap();
        assert_eq!(portfolio.user_id, "u1");
        assert_eq!(portfolio.quantity("fondo-001"), Some(12.5));
        assert_eq!(portfolio.quantity("fondo-003"), None);
        let other = store.snapshot("u2").await.unwrap();
        assert_eq!(other.quantity("fondo-003"), Some(1.0));
        assert_eq!(other.quantity("fondo-001"), None);
    }

    #[tokio::test]
    async fn test_snapshot_is_detached_from_store() {
        let store = MemoryPortfolioStore::new();
        store.credit("u1", "fondo-001", 1.0).await;

        let mut copy = store.snapshot("u1").await.unwrap();
        copy.credit("fondo-001", 100.0);

        let fresh = store.snapshot("u1").await.unwrap();
        assert_eq!(fresh.quantity("fondo-001"), Some(1.0));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_credits_do_not_lose_updates() {
        let store = MemoryPortfolioStore::new();

        let tasks: Vec<_> = (0..200)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.credit("u1", "fondo-001", 1.0).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let portfolio = store.snapshot("u1").await.unwrap();
        assert_eq!(portfolio.quantity("fondo-001"), Some(200.0));
    }
}
