//! Error types for the ironlog_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for ironlog_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Exercise catalog or template validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// User input that could not be parsed (weight, reps, RPE, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Entity invariant violation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Session transition attempted in the wrong state
    #[error("Session error: {0}")]
    Session(String),

    /// Store write failed; in-memory state was left untouched
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Requested entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}
