//! Core business logic: catalog, pricing, holdings, deposits and valuation

pub mod catalog;
pub mod config;
pub mod error;
pub mod log;
pub mod portfolio;
pub mod price;
pub mod rounding;
pub mod service;
pub mod transaction;
pub mod valuation;

// Re-export main types for cleaner imports
pub use catalog::{Fund, FundCatalog, FundKind, RiskLevel};
pub use error::Error;
pub use portfolio::{Holding, Portfolio, PortfolioStore};
pub use price::{DriftRange, FixedPriceOracle, PriceOracle, PriceQuote, SyntheticPriceOracle};
pub use service::InvestmentService;
pub use transaction::{DepositReceipt, DepositRequest};
pub use valuation::PortfolioReport;
