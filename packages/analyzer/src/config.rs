//! Analyzer configuration
//!
//! Loads diagnostic settings from JSON. Every field has a default, so an
//! empty object (or a partial one) is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Settings for every diagnostic the analyzer runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyzerConfig {
    pub identical_expressions: IdenticalExpressionsConfig,
    pub nested_constructors_in_structure_declaration: DiagnosticSwitch,
    pub duplicated_conditions: DiagnosticSwitch,
}

/// On/off switch for a diagnostic without parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiagnosticSwitch {
    pub enabled: bool,
}

impl Default for DiagnosticSwitch {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IdenticalExpressionsConfig {
    pub enabled: bool,
    /// Comma separated numbers that may legitimately appear on both sides of
    /// `*` and `/`, e.g. `60 * 60`
    pub popular_divisors: String,
    /// Treat `AND`/`OR` operands as swappable
    pub logical_operations_as_transitive: bool,
}

impl Default for IdenticalExpressionsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            popular_divisors: "60, 1024".to_string(),
            logical_operations_as_transitive: false,
        }
    }
}

impl IdenticalExpressionsConfig {
    /// The configured divisors, trimmed; empty entries are ignored
    pub fn popular_divisors(&self) -> Vec<&str> {
        self.popular_divisors
            .split(',')
            .map(str::trim)
            .filter(|divisor| !divisor.is_empty())
            .collect()
    }
}

impl AnalyzerConfig {
    /// Parse a configuration from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: AnalyzerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!("Loading analyzer configuration from {}", path.display());
        Self::from_json_str(&content)
    }

    /// Check parameters that serde alone cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        for divisor in self.identical_expressions.popular_divisors() {
            if divisor.parse::<f64>().is_err() {
                return Err(ConfigError::InvalidParameter {
                    parameter: "popularDivisors",
                    message: format!("`{}` is not a number", divisor),
                });
            }
        }
        Ok(())
    }
}
