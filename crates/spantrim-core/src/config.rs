//! spantrim Configuration Management
//!
//! Handles configuration from environment variables and TOML config files
//! with defaults matching the stock trim extractor.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TrimConfig {
    /// Extractor behaviour
    pub extractor: ExtractorConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl TrimConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(name) = std::env::var("SPANTRIM_ENTITY") {
            config.extractor.entity_name = name;
        }
        if let Ok(locale) = std::env::var("SPANTRIM_DEFAULT_LOCALE") {
            config.extractor.default_locale = locale;
        }
        if let Ok(keep) = std::env::var("SPANTRIM_KEEP_OVERLAPS") {
            config.extractor.keep_overlaps = parse_bool("SPANTRIM_KEEP_OVERLAPS", &keep)?;
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(json) = std::env::var("LOG_JSON") {
            config.logging.json_format = parse_bool("LOG_JSON", &json)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        let env_config = Self::from_env()?;
        let defaults = Self::default();

        // Only override if env values differ from defaults
        if env_config.extractor.entity_name != defaults.extractor.entity_name {
            self.extractor.entity_name = env_config.extractor.entity_name;
        }
        if env_config.extractor.default_locale != defaults.extractor.default_locale {
            self.extractor.default_locale = env_config.extractor.default_locale;
        }
        if env_config.extractor.keep_overlaps {
            self.extractor.keep_overlaps = true;
        }
        if env_config.logging.level != defaults.logging.level {
            self.logging.level = env_config.logging.level;
        }
        if env_config.logging.json_format {
            self.logging.json_format = true;
        }

        Ok(self)
    }

    /// Reject values the extractor cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extractor.entity_name.trim().is_empty() {
            return Err(ConfigError::MissingRequired("extractor.entity_name".to_string()));
        }
        if self.extractor.default_locale.trim().is_empty() {
            return Err(ConfigError::MissingRequired(
                "extractor.default_locale".to_string(),
            ));
        }
        Ok(())
    }
}

/// Trim extractor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Identifier written into every produced edge
    pub entity_name: String,

    /// Locale used when an input record carries none
    pub default_locale: String,

    /// Pass overlapping edges through the reducer untouched
    pub keep_overlaps: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            entity_name: "extract-trim".to_string(),
            default_locale: "en".to_string(),
            keep_overlaps: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,

    /// Include file/line in logs
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            include_location: false,
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
