//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid process root: {0}")]
    InvalidProcessRoot(String),

    #[error("Excerpt keeps {kept} chars but prunes above {threshold}")]
    ExcerptBudgetTooLarge { kept: usize, threshold: usize },

    #[error("Invalid log filter directive: {0}")]
    InvalidLogFilter(String),
}
