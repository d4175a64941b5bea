use crate::core::catalog::{Fund, FundCatalog};
use crate::core::config::AppConfig;
use crate::core::error::{Error, Result};
use crate::core::portfolio::PortfolioStore;
use crate::core::price::{PriceOracle, PriceQuote, SyntheticPriceOracle};
use crate::core::transaction::{self, DepositReceipt, DepositRequest};
use crate::core::valuation::{self, PortfolioReport};
use crate::store::MemoryPortfolioStore;
use std::sync::Arc;
use tracing::debug;

/// Entry point for catalog listing, deposits and valuations. Owns the
/// catalog, the price oracle and the portfolio store.
#[derive(Clone)]
pub struct InvestmentService {
    catalog: Arc<FundCatalog>,
    oracle: Arc<dyn PriceOracle + Send + Sync>,
    store: Arc<dyn PortfolioStore + Send + Sync>,
}

impl InvestmentService {
    pub fn new(
        catalog: FundCatalog,
        oracle: Arc<dyn PriceOracle + Send + Sync>,
        store: Arc<dyn PortfolioStore + Send + Sync>,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            oracle,
            store,
        }
    }

    /// Builds the catalog and oracle from configuration over an in-memory
    /// store holding the configured demo portfolios.
    pub async fn from_config(config: &AppConfig) -> Self {
        let catalog = config.catalog();
        let drift = config.oracle.drift();
        let oracle: Arc<dyn PriceOracle + Send + Sync> = match config.oracle.seed {
            Some(seed) => Arc::new(SyntheticPriceOracle::seeded(&catalog, drift, seed)),
            None => Arc::new(SyntheticPriceOracle::new(&catalog, drift)),
        };

        let store = MemoryPortfolioStore::new();
        for (user_id, holdings) in &config.demo_portfolios {
            for (fund_id, quantity) in holdings {
                store.credit(user_id, fund_id, *quantity).await;
            }
            debug!(user_id, holdings = holdings.len(), "Seeded demo portfolio");
        }
        Self::new(catalog, oracle, Arc::new(store))
    }

    pub fn list_funds(&self) -> &[Fund] {
        self.catalog.funds()
    }

    pub fn get_fund(&self, fund_id: &str) -> Result<&Fund> {
        self.catalog
            .get(fund_id)
            .ok_or_else(|| Error::fund_not_found(fund_id))
    }

    pub fn quote(&self, fund_id: &str) -> Result<PriceQuote> {
        let fund = self.get_fund(fund_id)?;
        Ok(self.oracle.quote(&fund.id))
    }

    pub async fn deposit(&self, request: &DepositRequest) -> Result<DepositReceipt> {
        transaction::apply_deposit(
            &self.catalog,
            self.oracle.as_ref(),
            self.store.as_ref(),
            request,
        )
        .await
    }

    pub async fn portfolio(&self, user_id: &str) -> PortfolioReport {
        let portfolio = self.store.snapshot(user_id).await;
        valuation::build_report(
            user_id,
            portfolio.as_ref(),
            &self.catalog,
            self.oracle.as_ref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::default_funds;
    use crate::core::price::FixedPriceOracle;

    fn service() -> InvestmentService {
        InvestmentService::new(
            FundCatalog::new(default_funds()),
            Arc::new(FixedPriceOracle::new().with_price("fondo-003", 10.0)),
            Arc::new(MemoryPortfolioStore::new()),
        )
    }

    #[tokio::test]
    async fn test_deposit_then_report() {
        let service = service();
        service
            .deposit(&DepositRequest::new("u1", "fondo-001", 10.0))
            .await
            .unwrap();
        service
            .deposit(&DepositRequest::new("u1", "fondo-003", 50.0))
            .await
            .unwrap();

        let report = service.portfolio("u1").await;
        assert_eq!(report.total_donated, 10.0);
        assert_eq!(report.total_invested, 50.0);
        assert_eq!(report.total, 60.0);
        assert_eq!(report.investments[0].units, 5.0);
    }

    #[tokio::test]
    async fn test_unknown_user_report_is_empty() {
        let report = service().portfolio("nobody").await;
        assert_eq!(report, PortfolioReport::empty("nobody"));
    }

    #[test]
    fn test_fund_lookup_and_quote() {
        let service = service();
        assert_eq!(service.list_funds().len(), 4);
        assert_eq!(
            service.get_fund("fondo-003").unwrap().name,
            "Tech Global (Riesgo Alto)"
        );
        assert_eq!(service.quote("fondo-003").unwrap().price, 10.0);
        assert!(matches!(service.quote("fondo-999"), Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_from_default_config() {
        let service = InvestmentService::from_config(&AppConfig::default()).await;
        assert_eq!(service.list_funds().len(), 4);
        assert_eq!(service.quote("fondo-001").unwrap().price, 1.0);
    }

    #[tokio::test]
    async fn test_default_config_seeds_demo_user() {
        let service = InvestmentService::from_config(&AppConfig::default()).await;

        let report = service.portfolio("user-123-test").await;
        let ids: Vec<&str> = report.investments.iter().map(|l| l.fund_id.as_str()).collect();
        assert_eq!(ids, vec!["fondo-003"]);
        assert_eq!(report.investments[0].units, 5.0);
        assert_eq!(report.total_donated, 10.0);
        assert_eq!(report.donations[0].fund_id, "fondo-001");
        // 5 units of a fund based at 10.0
        assert!((49.25..=52.5).contains(&report.total_invested));
    }

    #[tokio::test]
    async fn test_demo_portfolios_can_be_disabled() {
        let config = AppConfig {
            demo_portfolios: Default::default(),
            ..AppConfig::default()
        };
        let service = InvestmentService::from_config(&config).await;
        let report = service.portfolio("user-123-test").await;
        assert_eq!(report, PortfolioReport::empty("user-123-test"));
    }
}
