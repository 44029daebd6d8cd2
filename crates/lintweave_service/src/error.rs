//! Service error types.

use lintweave_core::LintError;
use thiserror::Error;

/// Errors raised inside the service layer.
///
/// None of these cross the decorated language service boundary; they are
/// logged and the host's own results are returned instead.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The plugin settings block is invalid.
    #[error("Invalid settings: {0}")]
    Settings(String),

    /// The lint pass failed.
    #[error(transparent)]
    Lint(#[from] LintError),

    /// The project configuration could not be read.
    #[error("Cannot read project configuration {path}: {message}")]
    ProjectConfig { path: String, message: String },
}

impl ServiceError {
    pub fn settings(message: impl Into<String>) -> Self {
        Self::Settings(message.into())
    }
}
