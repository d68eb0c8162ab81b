//! Error types for nswatch
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for nswatch operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, watch subscription establishment, replay
/// parsing, and log sink setup.
#[derive(Error, Debug)]
pub enum NswatchError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Watch feed errors (subscription, delivery, sync)
    #[error("Watch feed error: {0}")]
    Feed(String),

    /// Replay script loading errors
    #[error("Replay error: {0}")]
    Replay(String),

    /// Log sink initialization errors
    #[error("Logging error: {0}")]
    Logging(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for nswatch operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
