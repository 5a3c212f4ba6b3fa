// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Engine configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! retry_budget = 100
//! seed = 42
//! algorithm = "greedy"
//! prefer_latest = false
//! counter_prefix = "PAPI_"
//! device_subsystem = "CUDA"
//! ```
//!
//! Every key is optional; missing keys take the defaults shown above,
//! except `seed`, which defaults to OS entropy.

use crate::EngineError;
use partition_planner::{
    Algorithm, NamespaceRouter, DEFAULT_COUNTER_PREFIX, DEFAULT_DEVICE_SUBSYSTEM,
    DEFAULT_RETRY_BUDGET,
};
use std::path::Path;

/// Configuration for the partitioning engine.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of shuffled greedy trials per counter request.
    pub retry_budget: usize,
    /// RNG seed for reproducible runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Default counter algorithm: `"greedy"` or `"cached"`.
    pub algorithm: String,
    /// Default for returning the fresh partition even when the cache holds
    /// a better one.
    pub prefer_latest: bool,
    /// Name prefix of hardware counter events.
    pub counter_prefix: String,
    /// Leading component of device-domain event paths.
    pub device_subsystem: String,
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EngineError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, EngineError> {
        toml::from_str(toml_str)
            .map_err(|e| EngineError::ConfigError(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self)
            .map_err(|e| EngineError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// Parses the configured default algorithm.
    pub fn parse_algorithm(&self) -> Result<Algorithm, EngineError> {
        self.algorithm
            .parse()
            .map_err(|e| EngineError::ConfigError(format!("{e}")))
    }

    /// Builds the namespace router for the configured prefixes.
    pub fn router(&self) -> NamespaceRouter {
        NamespaceRouter::new(&self.counter_prefix, &self.device_subsystem)
    }

    /// Checks every field.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.retry_budget == 0 {
            return Err(EngineError::ConfigError(
                "retry_budget must be at least 1".into(),
            ));
        }
        if self.counter_prefix.is_empty() {
            return Err(EngineError::ConfigError(
                "counter_prefix must not be empty".into(),
            ));
        }
        if self.device_subsystem.is_empty() || self.device_subsystem.contains('.') {
            return Err(EngineError::ConfigError(format!(
                "invalid device_subsystem '{}'",
                self.device_subsystem,
            )));
        }
        self.parse_algorithm()?;
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            retry_budget: DEFAULT_RETRY_BUDGET,
            seed: None,
            algorithm: Algorithm::Greedy.to_string(),
            prefer_latest: false,
            counter_prefix: DEFAULT_COUNTER_PREFIX.to_string(),
            device_subsystem: DEFAULT_DEVICE_SUBSYSTEM.to_string(),
        }
    }
}
