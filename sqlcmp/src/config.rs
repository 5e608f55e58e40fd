// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Engine configuration

use crate::collation;
use crate::compare::CompareOptions;
use crate::scope::{ScopeOptions, MAX_NESTING_LEVEL};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Engine-wide settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Collation used for string operands that do not carry their own
    pub default_collation: String,

    /// Explicit epsilon for approximate float equality
    pub float_epsilon: Option<f64>,

    /// Derive an epsilon from the declared decimals of both float operands
    pub derive_epsilon_from_decimals: bool,

    /// Maximum number of stored conditions per statement
    pub max_error_count: usize,

    /// Reject aggregates over outer columns that cannot be aggregated outside
    pub ansi_aggregate_scope: bool,

    /// Reject blocks mixing aggregates and plain columns without GROUP BY
    pub only_full_group_by: bool,

    /// Deepest allowed query block nesting level
    pub max_nesting_level: usize,

    /// Largest IN list that is materialized into a sorted vector
    pub max_in_list_elements: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_collation: "binary".to_string(),
            float_epsilon: None,
            derive_epsilon_from_decimals: true,
            max_error_count: 64,
            ansi_aggregate_scope: false,
            only_full_group_by: false,
            max_nesting_level: MAX_NESTING_LEVEL,
            max_in_list_elements: 1_000_000,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a configuration from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::debug!("Loading engine configuration from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if collation::lookup(&self.default_collation).is_none() {
            return Err(ConfigError::InvalidValue {
                field: "default_collation".to_string(),
                message: format!("unknown collation '{}'", self.default_collation),
            });
        }

        if let Some(epsilon) = self.float_epsilon {
            if !epsilon.is_finite() || epsilon < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: "float_epsilon".to_string(),
                    message: format!("{} is not a finite non-negative number", epsilon),
                });
            }
        }

        if self.max_nesting_level > MAX_NESTING_LEVEL {
            return Err(ConfigError::InvalidValue {
                field: "max_nesting_level".to_string(),
                message: format!("must not exceed {}", MAX_NESTING_LEVEL),
            });
        }

        if self.max_in_list_elements == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_in_list_elements".to_string(),
                message: "must be positive".to_string(),
            });
        }

        Ok(())
    }

    /// Comparator binding options derived from this configuration
    pub fn compare_options(&self) -> CompareOptions {
        CompareOptions {
            epsilon: self.float_epsilon,
            derive_epsilon_from_decimals: self.derive_epsilon_from_decimals,
            max_in_list_elements: self.max_in_list_elements,
            ..CompareOptions::default()
        }
    }

    /// Aggregate scope options derived from this configuration
    pub fn scope_options(&self) -> ScopeOptions {
        ScopeOptions {
            ansi: self.ansi_aggregate_scope,
            only_full_group_by: self.only_full_group_by,
            max_nesting_level: self.max_nesting_level,
        }
    }
}
