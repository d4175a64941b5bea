//! Fund catalog: the static list of investable and donatable instruments

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Determines how deposits into a fund are held and valued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FundKind {
    /// Deposits buy units at the current quote; valued at the current quote.
    Investment,
    /// Deposits accumulate as cash; valued at face amount.
    Donation,
}

impl Display for FundKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                FundKind::Investment => "Investment",
                FundKind::Donation => "Donation",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RiskLevel::Low => "Low",
                RiskLevel::Medium => "Medium",
                RiskLevel::High => "High",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fund {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: FundKind,
    pub risk_level: RiskLevel,
    pub estimated_annual_return: String,
    /// Reference price the oracle perturbs. Ignored for donation funds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_price: Option<f64>,
}

impl Fund {
    pub fn is_investment(&self) -> bool {
        self.kind == FundKind::Investment
    }
}

/// Read-only list of funds, kept in configuration order.
#[derive(Debug, Clone, Default)]
pub struct FundCatalog {
    funds: Vec<Fund>,
}

impl FundCatalog {
    pub fn new(funds: Vec<Fund>) -> Self {
        Self { funds }
    }

    pub fn funds(&self) -> &[Fund] {
        &self.funds
    }

    pub fn get(&self, fund_id: &str) -> Option<&Fund> {
        self.funds.iter().find(|f| f.id == fund_id)
    }

    /// Base prices of every investment fund that declares one.
    pub fn base_prices(&self) -> impl Iterator<Item = (&str, f64)> {
        self.funds
            .iter()
            .filter(|f| f.is_investment())
            .filter_map(|f| f.base_price.map(|p| (f.id.as_str(), p)))
    }
}

/// The catalog used when configuration does not list any funds.
pub fn default_funds() -> Vec<Fund> {
    vec![
        Fund {
            id: "fondo-001".to_string(),
            name: "Fondo Verde (Replantar)".to_string(),
            description: "Invierte en proyectos de reforestación global.".to_string(),
            kind: FundKind::Donation,
            risk_level: RiskLevel::Low,
            estimated_annual_return: "N/A".to_string(),
            base_price: None,
        },
        Fund {
            id: "fondo-002".to_string(),
            name: "Océanos Limpios".to_string(),
            description: "Apoya a ONGs que limpian plástico del mar.".to_string(),
            kind: FundKind::Donation,
            risk_level: RiskLevel::Low,
            estimated_annual_return: "N/A".to_string(),
            base_price: None,
        },
        Fund {
            id: "fondo-003".to_string(),
            name: "Tech Global (Riesgo Alto)".to_string(),
            description: "Fondo que sigue a las 10 empresas de tecnología más grandes."
                .to_string(),
            kind: FundKind::Investment,
            risk_level: RiskLevel::High,
            estimated_annual_return: "12.5%".to_string(),
            base_price: Some(10.0),
        },
        Fund {
            id: "fondo-004".to_string(),
            name: "S&P 500 (Riesgo Medio)".to_string(),
            description: "Sigue el índice S&P 500 de EE.UU.".to_string(),
            kind: FundKind::Investment,
            risk_level: RiskLevel::Medium,
            estimated_annual_return: "8.0%".to_string(),
            base_price: Some(25.0),
        },
    ]
}
