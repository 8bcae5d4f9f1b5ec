//! Configuration loading and management for the hourly rate client.
//!
//! This module provides functionality to load the client configuration from
//! a YAML file: the API root, wage bounds, cache TTLs and currency format.
//!
//! # Example
//!
//! ```no_run
//! use hourly_rates::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/client.yaml").unwrap();
//! println!("Rates endpoint: {}", config.config().rates_url());
//! ```

mod loader;
mod types;

pub use loader::{ConfigLoader, API_ROOT_ENV};
pub use types::{CacheTtls, ClientConfig, DEFAULT_API_ROOT};
