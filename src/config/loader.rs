//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the client
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{RateError, RateResult};

use super::types::ClientConfig;

/// Environment variable that overrides `api_root`.
pub const API_ROOT_ENV: &str = "HOURLY_RATES_API_ROOT";

/// Loads and validates the client configuration.
///
/// # File Format
///
/// ```yaml
/// api_root: "https://hr.example.com/api"
/// wage_bounds:
///   minimum: "18.00"
///   maximum: "500.00"
/// cache:
///   standard_hours_ttl_secs: 300
///   overtime_multipliers_ttl_secs: 600
/// currency:
///   symbol: "$"
///   fraction_digits: 2
/// ```
///
/// Every key is optional.
///
/// # Example
///
/// ```no_run
/// use hourly_rates::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/client.yaml")?.with_env_overrides()?;
/// println!("API root: {}", loader.config().api_root);
/// # Ok::<(), hourly_rates::error::RateError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: ClientConfig,
}

impl ConfigLoader {
    /// Loads configuration from the YAML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`RateError::ConfigNotFound`] if the file cannot be read
    /// - [`RateError::ConfigParseError`] if it is not valid YAML, does not
    ///   match the expected shape, or fails validation
    pub fn load<P: AsRef<Path>>(path: P) -> RateResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| RateError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let loader = Self::parse(&content, &path_str)?;
        debug!(path = %path_str, api_root = %loader.config.api_root, "Loaded client configuration");
        Ok(loader)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(content: &str) -> RateResult<Self> {
        Self::parse(content, "<inline>")
    }

    /// Wraps an already built configuration, validating it.
    pub fn from_config(config: ClientConfig) -> RateResult<Self> {
        Self::validate(&config, "<inline>")?;
        Ok(Self { config })
    }

    /// Applies environment overrides (`HOURLY_RATES_API_ROOT`).
    pub fn with_env_overrides(self) -> RateResult<Self> {
        self.with_api_root_override(std::env::var(API_ROOT_ENV).ok())
    }

    fn with_api_root_override(mut self, api_root: Option<String>) -> RateResult<Self> {
        if let Some(api_root) = api_root {
            debug!(api_root = %api_root, "Overriding API root from environment");
            self.config.api_root = api_root;
            Self::validate(&self.config, API_ROOT_ENV)?;
        }
        Ok(self)
    }

    fn parse(content: &str, source: &str) -> RateResult<Self> {
        // An empty file is a valid, all-defaults configuration.
        let config: ClientConfig = if content.trim().is_empty() {
            ClientConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| RateError::ConfigParseError {
                path: source.to_string(),
                message: e.to_string(),
            })?
        };

        Self::validate(&config, source)?;
        Ok(Self { config })
    }

    fn validate(config: &ClientConfig, source: &str) -> RateResult<()> {
        let invalid = |message: &str| RateError::ConfigParseError {
            path: source.to_string(),
            message: message.to_string(),
        };

        if config.api_root.trim().is_empty() {
            return Err(invalid("api_root must not be empty"));
        }
        if config.wage_bounds.minimum > config.wage_bounds.maximum {
            return Err(invalid("wage_bounds.minimum must not exceed wage_bounds.maximum"));
        }
        Ok(())
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_full_yaml_is_loaded() {
        let yaml = r#"
api_root: "https://hr.example.com/api"
wage_bounds:
  minimum: "20.00"
  maximum: "300.00"
cache:
  standard_hours_ttl_secs: 60
  overtime_multipliers_ttl_secs: 120
currency:
  symbol: "NT$"
  fraction_digits: 0
"#;
        let loader = ConfigLoader::from_yaml_str(yaml).unwrap();
        let config = loader.config();

        assert_eq!(config.api_root, "https://hr.example.com/api");
        assert_eq!(config.wage_bounds.minimum, dec("20.00"));
        assert_eq!(config.wage_bounds.maximum, dec("300.00"));
        assert_eq!(config.cache.standard_hours_ttl_secs, 60);
        assert_eq!(config.cache.overtime_multipliers_ttl_secs, 120);
        assert_eq!(config.currency.symbol, "NT$");
        assert_eq!(config.currency.fraction_digits, 0);
        assert_eq!(config.currency.thousands_separator, ",");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let loader = ConfigLoader::from_yaml_str("api_root: http://rates.internal\n").unwrap();
        let config = loader.into_config();

        assert_eq!(config.api_root, "http://rates.internal");
        assert_eq!(config.wage_bounds.minimum, dec("18.00"));
        assert_eq!(config.cache.overtime_multipliers_ttl_secs, 600);
    }

    #[test]
    fn test_empty_yaml_is_default_config() {
        let loader = ConfigLoader::from_yaml_str("").unwrap();
        assert_eq!(loader.config(), &ClientConfig::default());
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let result = ConfigLoader::from_yaml_str("cache: [not, a, map]");
        match result {
            Err(RateError::ConfigParseError { path, .. }) => assert_eq!(path, "<inline>"),
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_api_root_is_rejected() {
        let result = ConfigLoader::from_yaml_str("api_root: \"  \"");
        match result {
            Err(RateError::ConfigParseError { message, .. }) => {
                assert!(message.contains("api_root"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_inverted_wage_bounds_are_rejected() {
        let yaml = "wage_bounds:\n  minimum: \"600\"\n  maximum: \"500\"\n";
        assert!(matches!(
            ConfigLoader::from_yaml_str(yaml),
            Err(RateError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_bundled_config_matches_defaults() {
        let loader = ConfigLoader::load("./config/client.yaml").expect("Failed to load config");
        assert_eq!(loader.config(), &ClientConfig::default());
    }

    #[test]
    fn test_load_missing_file_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path/client.yaml");
        match result {
            Err(RateError::ConfigNotFound { path }) => {
                assert!(path.contains("client.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_api_root_override_replaces_value() {
        let loader = ConfigLoader::default()
            .with_api_root_override(Some("http://override:8080/api".to_string()))
            .unwrap();
        assert_eq!(loader.config().api_root, "http://override:8080/api");
    }

    #[test]
    fn test_absent_override_keeps_value() {
        let loader = ConfigLoader::default().with_api_root_override(None).unwrap();
        assert_eq!(loader.config().api_root, "http://localhost:3000/api");
    }

    #[test]
    fn test_blank_override_is_rejected() {
        let result = ConfigLoader::default().with_api_root_override(Some(String::new()));
        assert!(matches!(result, Err(RateError::ConfigParseError { .. })));
    }
}
