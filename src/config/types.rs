//! Configuration types for the hourly rate client.
//!
//! These structures are deserialized from a YAML file. Every section is
//! optional and falls back to its default.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::calculation::{CurrencyFormat, WageBounds};

/// Default API root used when none is configured.
pub const DEFAULT_API_ROOT: &str = "http://localhost:3000/api";

/// Time-to-live settings for the configuration cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheTtls {
    /// TTL for standard hours, in seconds (default 5 minutes).
    pub standard_hours_ttl_secs: u64,
    /// TTL for overtime multipliers, in seconds (default 10 minutes).
    pub overtime_multipliers_ttl_secs: u64,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            standard_hours_ttl_secs: 5 * 60,
            overtime_multipliers_ttl_secs: 10 * 60,
        }
    }
}

impl CacheTtls {
    /// TTL for standard hours.
    pub fn standard_hours(&self) -> TimeDelta {
        seconds(self.standard_hours_ttl_secs)
    }

    /// TTL for overtime multipliers.
    pub fn overtime_multipliers(&self) -> TimeDelta {
        seconds(self.overtime_multipliers_ttl_secs)
    }
}

fn seconds(secs: u64) -> TimeDelta {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX)
}

/// Complete client configuration.
///
/// # Example
///
/// ```
/// use hourly_rates::config::ClientConfig;
///
/// let config = ClientConfig::default();
/// assert_eq!(config.api_root, "http://localhost:3000/api");
/// assert_eq!(config.cache.standard_hours_ttl_secs, 300);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root URL of the API; rate endpoints live under `{api_root}/hourly-rates`.
    pub api_root: String,
    /// Accepted hourly wage range.
    pub wage_bounds: WageBounds,
    /// Configuration cache TTLs.
    pub cache: CacheTtls,
    /// Currency display format.
    pub currency: CurrencyFormat,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_root: DEFAULT_API_ROOT.to_string(),
            wage_bounds: WageBounds::default(),
            cache: CacheTtls::default(),
            currency: CurrencyFormat::default(),
        }
    }
}

impl ClientConfig {
    /// Creates a default configuration pointing at `api_root`.
    pub fn with_api_root(api_root: impl Into<String>) -> Self {
        Self {
            api_root: api_root.into(),
            ..Self::default()
        }
    }

    /// Base URL of the hourly rate resource, without a trailing slash.
    pub fn rates_url(&self) -> String {
        format!("{}/hourly-rates", self.api_root.trim_end_matches('/'))
    }
}
