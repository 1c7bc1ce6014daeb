//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Event file not found
    #[error("Event file not found: {path}")]
    EventsNotFound { path: String },

    /// A line of the event file could not be decoded
    #[error("Invalid event on line {line}: {message}")]
    FixtureParse { line: usize, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn events_not_found(path: impl Into<String>) -> Self {
        Self::EventsNotFound { path: path.into() }
    }

    pub fn fixture_parse(line: usize, message: impl Into<String>) -> Self {
        Self::FixtureParse {
            line,
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
