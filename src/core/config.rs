use crate::core::analytics::DEFAULT_RENEWAL_WINDOW_DAYS;
use crate::core::subscription::DEFAULT_CURRENCY;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::{fs, path::PathBuf};
use tracing::debug;

/// Commented example written by `subtrack setup`.
pub const EXAMPLE_CONFIG: &str = include_str!("../../docs/example_config.yaml");

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_renewal_window_days")]
    pub renewal_window_days: u32,
    pub data_path: Option<String>,
    #[serde(default)]
    pub rates: HashMap<String, f64>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_renewal_window_days() -> u32 {
    DEFAULT_RENEWAL_WINDOW_DAYS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            renewal_window_days: default_renewal_window_days(),
            data_path: None,
            rates: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Loads the default config file, or defaults when none has been set up.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "subtrack", "subtrack")
            .context("Could not determine project directories")
    }

    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.yaml"))
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
currency: "EUR"
renewal_window_days: 14
data_path: "/tmp/subtrack"
rates:
  CHF: 0.88
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.currency, "EUR");
        assert_eq!(config.renewal_window_days, 14);
        assert_eq!(config.data_path().unwrap(), PathBuf::from("/tmp/subtrack"));
        assert_eq!(config.rates.get("CHF"), Some(&0.88));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.currency, "USD");
        assert_eq!(config.renewal_window_days, 7);
        assert!(config.data_path.is_none());
        assert!(config.rates.is_empty());
    }

    #[test]
    fn test_example_config_is_valid_yaml() -> Result<()> {
        let config: AppConfig =
            serde_yaml::from_str(EXAMPLE_CONFIG).context("Failed to parse example config")?;
        assert_eq!(config.currency, "USD");
        assert_eq!(config.rates.get("EUR"), Some(&0.92));
        Ok(())
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let err = AppConfig::load_from_path("/nonexistent/subtrack.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
