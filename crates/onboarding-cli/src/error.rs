//! Startup errors for the terminal app.

use thiserror::Error;

/// Errors that stop the app before or while it runs.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The question loader could not be configured.
    #[error(transparent)]
    Questions(#[from] onboarding_questions::ConfigError),

    /// Terminal I/O failed.
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}
