//! Error types for Lesson Core.

use thiserror::Error;

/// Result type alias for lesson operations.
pub type Result<T> = std::result::Result<T, LessonError>;

/// Main error type for the lesson pipeline.
#[derive(Debug, Error)]
pub enum LessonError {
    /// A lesson request field failed validation.
    #[error("Invalid lesson request: {field}: {reason}")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// AI provider returned an error.
    #[error("AI provider error: {0}")]
    ProviderError(String),

    /// Network request failed.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// AI output could not be turned into lesson content.
    #[error("Parse error: {0}")]
    Parse(String),

    /// AI content carries a different set of ability tiers than requested.
    #[error("Inconsistent tiers: {0}")]
    InconsistentTiers(String),

    /// A document could not be rendered or saved.
    #[error("Document assembly failed: {0}")]
    Assembly(String),

    /// The archive step failed.
    #[error("Packaging failed: {0}")]
    Packaging(String),

    /// IO operation failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Timeout occurred.
    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),
}

impl LessonError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}
