/*!
 * Error types for the sky-cms library.
 *
 * This module contains custom error types for the different layers of the
 * crate, using the thiserror crate for ergonomic error definitions.
 *
 * A duplicate translation is not an error: the uniqueness rule reports it as
 * a `RuleOutcome`. Everything here is an infrastructure or configuration
 * failure that callers are expected to propagate.
 */

use thiserror::Error;

/// Errors raised by record stores
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error from the SQLite driver
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Column is not a translatable column of the model
    #[error("Unknown translatable column '{column}' for model {model}")]
    UnknownColumn {
        /// Model type name
        model: String,
        /// Column that was requested
        column: String,
    },

    /// Locale cannot be used as a JSON path key
    #[error("Invalid locale key '{0}'")]
    InvalidLocale(String),

    /// Any other storage failure (locking, connection setup)
    #[error("Store error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Errors that abort a validation pass
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Model tag has no registered binding
    #[error("Unresolvable model type: {0}")]
    UnresolvableModel(String),

    /// Neither the form data nor the locale context supplied a locale
    #[error("No active locale could be resolved and no default locale is configured")]
    MissingLocale,

    /// Locale code cannot be used as a locale key
    #[error("Invalid locale code: '{0}'")]
    InvalidLocale(String),

    /// Error from the record store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors that can occur while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading or writing the configuration file
    #[error("Config file error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing the configuration file
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configuration values are inconsistent
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a record store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Error from a validation pass
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Error from configuration handling
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<rusqlite::Error> for ValidationError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Store(StoreError::Database(error))
    }
}
