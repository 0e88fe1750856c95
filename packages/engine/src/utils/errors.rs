// packages/engine/src/utils/errors.rs
//! Engine error types

use thiserror::Error;

/// Result alias used throughout the engine
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors raised by the seeder and the simulation scaffold
#[derive(Debug, Error)]
pub enum EngineError {
    /// SQLite open, schema or insert failure
    #[error("storage failed: {0}")]
    StorageFailed(String),

    /// Caller passed a value outside the accepted domain
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Chat or image backend call failed
    #[error("backend call failed: {0}")]
    BackendFailed(String),

    /// Configuration could not be loaded or applied
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Transcript or filesystem I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for EngineError {
    fn from(e: rusqlite::Error) -> Self {
        EngineError::StorageFailed(e.to_string())
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(e: reqwest::Error) -> Self {
        EngineError::BackendFailed(e.to_string())
    }
}

impl From<config::ConfigError> for EngineError {
    fn from(e: config::ConfigError) -> Self {
        EngineError::ConfigError(e.to_string())
    }
}
