//! Lint runner error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while resolving, configuring or running the lint engine.
#[derive(Debug, Error)]
pub enum LintError {
    /// Configuration discovery or parsing failed.
    #[error("Cannot read tslint configuration - '{0}'")]
    ConfigRead(String),

    /// The engine module could not be resolved or loaded.
    #[error("Lint engine not found: {0}")]
    EngineMissing(String),

    /// The engine itself failed while linting.
    #[error("Lint engine crashed: {0}")]
    EngineCrash(String),

    /// The configured engine search path does not exist.
    #[error("The setting 'nodePath' refers to '{}', but this path does not exist. The setting will be ignored.", .0.display())]
    InvalidNodePath(PathBuf),

    /// A subprocess did not finish in time.
    #[error("Process timed out after {0} ms")]
    Timeout(u128),

    /// The engine produced output that does not follow the protocol.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LintError {
    /// Creates a configuration read error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigRead(message.into())
    }

    /// Creates an engine crash error.
    pub fn crash(message: impl Into<String>) -> Self {
        Self::EngineCrash(message.into())
    }

    /// Creates a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }
}
