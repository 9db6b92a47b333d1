//! Configuration for megalist-core
//!
//! Centralized configuration for catalog size, order materialization, and
//! pagination defaults.

use serde::{Deserialize, Serialize};

/// System-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    /// Number of items in the virtual catalog
    pub catalog_size: u64,
    /// Length of the id prefix the custom order is lazily initialized to
    pub initial_order_len: u64,
    /// Extra custom-order entries scanned beyond the visible window
    pub scan_lookahead: usize,
    /// Append batch size used while extending the custom order
    pub extend_batch_size: usize,
    /// Maximum custom-order entries returned by the settings endpoint
    pub transport_order_cap: usize,
    /// Page number used when the request carries none (or garbage)
    pub default_page: u64,
    /// Page size used when the request carries none (or garbage)
    pub default_limit: u64,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            catalog_size: 1_000_000,
            initial_order_len: 10_000,
            scan_lookahead: 1_000,
            extend_batch_size: 10_000,
            transport_order_cap: 5_000,
            default_page: 1,
            default_limit: 20,
        }
    }
}

impl ListConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog_size == 0 {
            return Err(ConfigError::OutOfRange(
                "catalog_size must be positive".to_string(),
            ));
        }

        if self.initial_order_len == 0 {
            return Err(ConfigError::OutOfRange(
                "initial_order_len must be positive".to_string(),
            ));
        }

        if self.initial_order_len > self.catalog_size {
            return Err(ConfigError::OutOfRange(
                "initial_order_len must not exceed catalog_size".to_string(),
            ));
        }

        if self.extend_batch_size == 0 {
            return Err(ConfigError::OutOfRange(
                "extend_batch_size must be positive".to_string(),
            ));
        }

        if self.default_page == 0 || self.default_limit == 0 {
            return Err(ConfigError::OutOfRange(
                "default_page and default_limit must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Value is out of valid range
    OutOfRange(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::OutOfRange(msg) => write!(f, "Value out of range: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
