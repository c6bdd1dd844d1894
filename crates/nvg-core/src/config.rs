//! Configuration management for the NVG viewer.
//!
//! This module provides the configuration system used by the command-line front end:
//! - Loading from YAML files
//! - Environment variable overrides (`NVGVIEW__SECTION__FIELD`)
//! - Validation of all settings
//! - Logging, loader and output settings

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::Level;

/// Main application configuration.
///
/// Every section falls back to its defaults, so an empty YAML document is a valid
/// configuration.
///
/// # Examples
///
/// ```no_run
/// use nvg_core::config::AppConfig;
///
/// let config = AppConfig::from_file("nvgview.yaml").unwrap();
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// How documents are loaded into layers
    #[serde(default)]
    pub loader: LoaderConfig,

    /// How loaded layers are reported
    #[serde(default)]
    pub output: OutputConfig,
}

impl AppConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path.display().to_string()).into());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_yaml(&contents)
    }

    /// Loads configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| {
            ConfigError::InvalidFormat {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Loads configuration using the `config` crate, layering `NVGVIEW__*`
    /// environment variables over the file.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or merged.
    pub fn from_config_builder<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let config = config::Config::builder()
            .add_source(config::File::from(path).required(true))
            .add_source(
                config::Environment::with_prefix("NVGVIEW")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError::LoadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        config.try_deserialize().map_err(|e| {
            ConfigError::InvalidFormat {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the log level cannot be parsed.
    pub fn validate(&self) -> Result<()> {
        self.logging.parse_level()?;
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "text" or "json"
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Text
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Parses the log level string to a tracing Level.
    pub fn parse_level(&self) -> Result<Level> {
        self.level.parse().map_err(|_| {
            ConfigError::invalid_value(
                "logging.level",
                format!("Invalid log level: {}", self.level),
            )
            .into()
        })
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    Text,
    /// JSON format for structured logging
    Json,
}

/// Settings for turning NVG files into layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Leave points without id, coordinates and symbol code out of the message count
    #[serde(default = "default_true")]
    pub skip_empty_points: bool,

    /// Maximum number of top-level documents read per file (0 = unlimited)
    #[serde(default)]
    pub max_documents: usize,
}

fn default_true() -> bool {
    true
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            skip_empty_points: true,
            max_documents: 0,
        }
    }
}

impl LoaderConfig {
    /// Returns true once `read` documents reach the configured limit.
    pub fn limit_reached(&self, read: usize) -> bool {
        self.max_documents != 0 && read >= self.max_documents
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// How each loaded layer is printed
    #[serde(default)]
    pub format: OutputFormat,
}

/// Output format for loaded layers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per layer
    #[default]
    Summary,
    /// Indented element tree
    Tree,
    /// Element tree as JSON
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Text);
        assert!(config.loader.skip_empty_points);
        assert_eq!(config.loader.max_documents, 0);
        assert_eq!(config.output.format, OutputFormat::Summary);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = AppConfig::from_yaml("").unwrap();
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
logging:
  level: debug
  format: json
loader:
  skip_empty_points: false
  max_documents: 2
output:
  format: tree
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.logging.parse_level().unwrap(), Level::DEBUG);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(!config.loader.skip_empty_points);
        assert_eq!(config.loader.max_documents, 2);
        assert_eq!(config.output.format, OutputFormat::Tree);
    }

    #[test]
    fn test_invalid_log_level() {
        let yaml = "logging:\n  level: chatty\n";
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(AppConfig::from_yaml("output: [unterminated").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::from_file("/nonexistent/nvgview.yaml").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_document_limit() {
        let unlimited = LoaderConfig::default();
        assert!(!unlimited.limit_reached(1_000));

        let limited = LoaderConfig {
            max_documents: 1,
            ..LoaderConfig::default()
        };
        assert!(!limited.limit_reached(0));
        assert!(limited.limit_reached(1));
    }
}
