//! Configuration, loadable from TOML with per-field defaults.

pub mod defaults;
mod observability_config;
mod reasoning_config;

pub use observability_config::ObservabilityConfig;
pub use reasoning_config::ReasoningConfig;

use serde::{Deserialize, Serialize};

use crate::errors::{ConcordResult, ConfigError};

/// Root configuration for a Concord society.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcordConfig {
    pub reasoning: ReasoningConfig,
    pub observability: ObservabilityConfig,
}

impl ConcordConfig {
    /// Parse a TOML document. Missing sections and fields take their defaults.
    pub fn from_toml(toml_str: &str) -> ConcordResult<Self> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> ConcordResult<String> {
        toml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }
}
