use crate::core::config::AppConfig;
use anyhow::{Context, Result};
use std::path::Path;

const HEADER: &str = "\
# Configuration for roundup. Every section is optional.
# `server` and `oracle` keys are snake_case. Fund entries use the camelCase
# keys of the JSON API (riskLevel, estimatedAnnualReturn, basePrice).
# `demo_portfolios` maps user ids to holdings credited at startup.
";

/// Creates a default configuration file at the default location
pub fn setup() -> Result<()> {
    let path = AppConfig::default_config_path()?;
    setup_at_path(path)
}

/// Creates a default configuration file at the specified path
pub fn setup_at_path<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = format!("{HEADER}{}", AppConfig::default().to_yaml()?);

    std::fs::write(path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_setup_creates_loadable_config_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nested").join("config.yaml");

        setup_at_path(&config_path)?;

        assert!(config_path.exists());
        let content = fs::read_to_string(&config_path)?;
        assert!(content.starts_with("# Configuration for roundup"));
        assert!(content.contains("funds:"));
        assert!(content.contains("min_drift:"));
        assert!(content.contains("basePrice: 10.0"));
        assert!(content.contains("user-123-test:"));
        for key in ["snake_case", "camelCase", "demo_portfolios"] {
            assert!(HEADER.contains(key), "header does not mention {key}");
        }

        let config = AppConfig::load_from_path(&config_path)?;
        assert_eq!(config, AppConfig::default());

        Ok(())
    }

    #[test]
    fn test_setup_fails_if_config_exists() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.yaml");

        std::fs::write(&config_path, "test")?;

        let result = setup_at_path(&config_path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("already exists"));
        assert_eq!(fs::read_to_string(&config_path)?, "test");

        Ok(())
    }
}
