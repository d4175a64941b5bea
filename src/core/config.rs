use crate::core::catalog::{Fund, FundCatalog, FundKind, default_funds};
use crate::core::price::{DriftRange, QUOTE_DECIMALS};
use crate::core::rounding::round_to;
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    /// Allowed CORS origins. `"*"` allows any origin.
    pub cors_allow_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            cors_allow_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct OracleConfig {
    pub min_drift: f64,
    pub max_drift: f64,
    /// Fixes the quote sequence when set.
    pub seed: Option<u64>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        let drift = DriftRange::default();
        OracleConfig {
            min_drift: drift.min,
            max_drift: drift.max,
            seed: None,
        }
    }
}

impl OracleConfig {
    pub fn drift(&self) -> DriftRange {
        DriftRange {
            min: self.min_drift,
            max: self.max_drift,
        }
    }
}

/// Holdings credited at startup, keyed by user then fund. Quantities are
/// units for investment funds and cash for donation funds.
pub type DemoPortfolios = IndexMap<String, IndexMap<String, f64>>;

pub fn default_demo_portfolios() -> DemoPortfolios {
    let holdings = IndexMap::from([
        ("fondo-003".to_string(), 5.0),
        ("fondo-001".to_string(), 10.0),
    ]);
    IndexMap::from([("user-123-test".to_string(), holdings)])
}

/// `server` and `oracle` keys are snake_case. Fund entries use the same
/// camelCase keys as the JSON API (`riskLevel`, `basePrice`).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default = "default_funds")]
    pub funds: Vec<Fund>,
    #[serde(default = "default_demo_portfolios")]
    pub demo_portfolios: DemoPortfolios,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            server: ServerConfig::default(),
            oracle: OracleConfig::default(),
            funds: default_funds(),
            demo_portfolios: default_demo_portfolios(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "roundup", "roundup")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config")
    }

    pub fn validate(&self) -> Result<()> {
        let drift = self.oracle.drift();
        if !drift.min.is_finite() || !drift.max.is_finite() || drift.min > drift.max {
            bail!(
                "oracle drift range is invalid: [{}, {}]",
                drift.min,
                drift.max
            );
        }
        if drift.min <= -1.0 {
            bail!("oracle min_drift must be greater than -1, got {}", drift.min);
        }

        let mut seen = HashSet::new();
        for fund in &self.funds {
            if fund.id.is_empty() {
                bail!("fund ids must not be empty");
            }
            if !seen.insert(fund.id.as_str()) {
                bail!("duplicate fund id: {}", fund.id);
            }
            if fund.kind == FundKind::Investment {
                if let Some(price) = fund.base_price {
                    if !price.is_finite() || price <= 0.0 {
                        bail!("fund {} has a non-positive base price: {}", fund.id, price);
                    }
                    let lowest = round_to(price * (1.0 + drift.min), QUOTE_DECIMALS);
                    if lowest <= 0.0 {
                        bail!(
                            "fund {} can quote at {} with base price {} and min_drift {}",
                            fund.id,
                            lowest,
                            price,
                            drift.min
                        );
                    }
                }
            }
        }

        for (user_id, holdings) in &self.demo_portfolios {
            if user_id.is_empty() {
                bail!("demo portfolio user ids must not be empty");
            }
            for (fund_id, quantity) in holdings {
                if !seen.contains(fund_id.as_str()) {
                    bail!("demo portfolio {user_id} holds unknown fund {fund_id}");
                }
                if !quantity.is_finite() || *quantity < 0.0 {
                    bail!("demo portfolio {user_id} has invalid {fund_id} quantity: {quantity}");
                }
            }
        }
        Ok(())
    }

    pub fn catalog(&self) -> FundCatalog {
        FundCatalog::new(self.funds.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::RiskLevel;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
server:
  listen_addr: "0.0.0.0:8080"
  cors_allow_origins:
    - "http://localhost:3000"
oracle:
  min_drift: 0.0
  max_drift: 0.01
  seed: 7
funds:
  - id: "fondo-001"
    name: "Reforestación"
    description: "Trees"
    kind: donation
    riskLevel: low
    estimatedAnnualReturn: "N/A"
  - id: "fondo-003"
    name: "Fondo Verde"
    description: "Renewables"
    kind: investment
    riskLevel: high
    estimatedAnnualReturn: "6-8%"
    basePrice: 10.0
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        config.validate().unwrap();
        assert_eq!(config.server.listen_addr.port(), 8080);
        assert_eq!(config.server.cors_allow_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.oracle.seed, Some(7));
        assert_eq!(config.oracle.drift(), DriftRange { min: 0.0, max: 0.01 });
        assert_eq!(config.funds.len(), 2);
        assert_eq!(config.funds[0].kind, FundKind::Donation);
        assert_eq!(config.funds[0].base_price, None);
        assert_eq!(config.funds[1].risk_level, RiskLevel::High);
        assert_eq!(config.funds[1].base_price, Some(10.0));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.catalog().funds().len(), 4);
        assert_eq!(
            config.demo_portfolios["user-123-test"],
            IndexMap::from([("fondo-003".to_string(), 5.0), ("fondo-001".to_string(), 10.0)])
        );
        assert_eq!(config.server.listen_addr.port(), 5000);
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = AppConfig::default();
        let yaml = config.to_yaml().unwrap();
        let parsed: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validation_failures() {
        let mut config = AppConfig::default();
        config.funds.push(config.funds[0].clone());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate fund id"));

        let mut config = AppConfig::default();
        config.funds[2].base_price = Some(0.0);
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.oracle.min_drift = 0.1;
        config.oracle.max_drift = 0.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.oracle.min_drift = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_base_price_that_quotes_at_zero_is_rejected() {
        let yaml_str = r#"
oracle:
  min_drift: 0.0
  max_drift: 0.0
funds:
  - id: "penny"
    name: "Penny"
    description: "Rounds away"
    kind: investment
    riskLevel: low
    estimatedAnnualReturn: "0%"
    basePrice: 0.00004
demo_portfolios: {}
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("penny"), "{err}");

        // Still positive after the largest downward drift.
        let mut config = AppConfig::default();
        config.funds[2].base_price = Some(0.0001);
        config.oracle.min_drift = 0.0;
        assert!(config.validate().is_ok());
        config.oracle.min_drift = -0.9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_demo_portfolio_validation() {
        let mut config = AppConfig::default();
        config.demo_portfolios["user-123-test"].insert("fondo-999".to_string(), 1.0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("unknown fund"));

        let mut config = AppConfig::default();
        config.demo_portfolios["user-123-test"]["fondo-001"] = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.demo_portfolios["user-123-test"]["fondo-001"] = -1.0;
        assert!(config.validate().is_err());

        let config: AppConfig = serde_yaml::from_str("demo_portfolios: {}").unwrap();
        assert!(config.demo_portfolios.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn test_load_from_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), "oracle:\n  min_drift: 0.0\n  max_drift: 0.0\n").unwrap();
        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.oracle.drift(), DriftRange { min: 0.0, max: 0.0 });
        assert_eq!(config.funds, default_funds());

        fs::write(file.path(), "funds: [").unwrap();
        assert!(AppConfig::load_from_path(file.path()).is_err());
    }
}
