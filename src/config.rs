//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.spdash.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Survey source settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Cohort settings.
    #[serde(default)]
    pub cohort: CohortConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Survey source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Endpoint URL serving the JSON response array.
    #[serde(default)]
    pub endpoint: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// Cohort settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortConfig {
    /// Total number of trainees in the workshop.
    ///
    /// Used for the response-rate percentage. This is deliberately a
    /// configuration value rather than a constant in the logic.
    #[serde(default = "default_total_trainees")]
    pub total_trainees: usize,
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self {
            total_trainees: default_total_trainees(),
        }
    }
}

fn default_total_trainees() -> usize {
    11
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Report title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Include the feedback wall section.
    #[serde(default = "default_true")]
    pub include_wall: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            include_wall: true,
        }
    }
}

fn default_title() -> String {
    "標準化病人培訓工作坊 — 成效儀表板".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".spdash.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref endpoint) = args.endpoint {
            self.source.endpoint = endpoint.clone();
        }
        if let Some(timeout) = args.timeout {
            self.source.timeout_seconds = timeout;
        }
        if let Some(total) = args.total_trainees {
            self.cohort.total_trainees = total;
        }
        if args.no_wall {
            self.report.include_wall = false;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.source.endpoint.is_empty());
        assert_eq!(config.source.timeout_seconds, 30);
        assert_eq!(config.cohort.total_trainees, 11);
        assert!(config.report.include_wall);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[source]
endpoint = "https://script.google.com/macros/s/DEPLOYMENT/exec"
timeout_seconds = 10

[cohort]
total_trainees = 14

[report]
include_wall = false
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(
            config.source.endpoint,
            "https://script.google.com/macros/s/DEPLOYMENT/exec"
        );
        assert_eq!(config.source.timeout_seconds, 10);
        assert_eq!(config.cohort.total_trainees, 14);
        assert!(!config.report.include_wall);
        // Unset sections keep their defaults.
        assert!(!config.report.title.is_empty());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[source]"));
        assert!(toml_str.contains("[cohort]"));
        assert!(toml_str.contains("[report]"));
    }
}
