//! spantrim Core - Domain models, errors, and configuration
//!
//! This crate defines the shared abstractions used by the trim extractor:
//! - Input records flowing through the NER pipeline
//! - Trim rules, conditions, and span strategies
//! - Candidate spans (edges) and anchor positions
//! - Common error types
//! - Configuration management

pub mod config;
pub mod model;

pub use config::{ConfigError, ExtractorConfig, LoggingConfig, TrimConfig};
pub use model::{
    AnchorPosition, Condition, ConditionOptions, Edge, Pattern, Rule, SpanStrategy, TrimInput,
    TRIM_RULE_TYPE,
};

use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for trim extraction
#[derive(Error, Debug)]
pub enum TrimError {
    #[error("Invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Input record has neither `text` nor `utterance`")]
    MissingText,

    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TrimError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TrimError::InvalidPattern {
            pattern: "(".to_string(),
            reason: "unclosed group".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid pattern \"(\": unclosed group");
        assert!(TrimError::MissingText.to_string().contains("utterance"));
    }

    #[test]
    fn test_config_error_conversion() {
        let err: TrimError = ConfigError::MissingRequired("entity_name".to_string()).into();
        assert!(matches!(err, TrimError::ConfigError(_)));
    }
}
