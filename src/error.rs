use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Validation error: {0}")]
    #[diagnostic(code(aikataulu::validation))]
    Validation(String),

    #[error("Time slot conflict: {0}")]
    #[diagnostic(code(aikataulu::conflict))]
    Conflict(String),

    #[error("Not found: {0}")]
    #[diagnostic(code(aikataulu::not_found))]
    NotFound(String),

    #[error("Unsupported recurrence type: {0}")]
    #[diagnostic(code(aikataulu::recurrence))]
    UnsupportedRecurrence(String),

    #[error("Notification error: {0}")]
    #[diagnostic(code(aikataulu::notification))]
    Notification(String),

    #[error("Event store error: {0}")]
    #[diagnostic(code(aikataulu::store))]
    Store(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(aikataulu::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(aikataulu::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(aikataulu::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(aikataulu::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(aikataulu::other))]
    Other(String),
}

// Implement From for TOML serialization errors
impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
#[allow(dead_code)]
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create validation errors
pub fn validation_error(message: &str) -> Error {
    Error::Validation(message.to_string())
}

/// Helper to create event store errors
pub fn store_error(message: &str) -> Error {
    Error::Store(message.to_string())
}

/// Helper to create not-found errors
pub fn not_found_error(message: &str) -> Error {
    Error::NotFound(message.to_string())
}

/// Helper to create other errors
#[allow(dead_code)]
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
