//! Error types for app-module generation

use appgen_ordering::OrderingError;
use appgen_sections::SectionError;
use thiserror::Error;

/// Errors that can occur while generating an app module
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A section could not be located or rewritten
    #[error("Section error: {0}")]
    Section(#[from] SectionError),

    /// Subsystem dependencies are circular
    #[error("Ordering error: {0}")]
    Ordering(#[from] OrderingError),

    /// A section template failed to parse
    #[error("Invalid template for section '{section}': {message}")]
    Template {
        /// Section whose template was rejected
        section: String,
        /// Parser message
        message: String,
    },

    /// A section template failed to render
    #[error("Render error in section '{section}': {message}")]
    Render {
        /// Section being rendered
        section: String,
        /// Renderer message
        message: String,
    },

    /// No section with this name is configured
    #[error("Unknown section: {0}")]
    UnknownSection(String),

    /// Feature-set metadata is unusable
    #[error("Invalid feature set '{name}': {reason}")]
    InvalidFeatureSet {
        /// Offending feature-set name
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// Generator configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// Context serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for GenerationError {
    fn from(err: config::ConfigError) -> Self {
        GenerationError::Config(err.to_string())
    }
}

/// Result type for generation operations
pub type Result<T> = std::result::Result<T, GenerationError>;
