//! Error types for the watcher

use thiserror::Error;

/// Result type alias using our custom Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the watcher
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing filter threshold: {0}")]
    MissingThreshold(&'static str),

    // Record normalization errors
    #[error("Malformed {field} value: '{value}'")]
    Parse { field: &'static str, value: String },

    // External service errors
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Risk service error: {0}")]
    Service(String),

    #[error("Notification failed: {0}")]
    Notify(String),

    // Storage errors
    #[error("Persistence error: {0}")]
    Persistence(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Check if this error aborts the current pipeline run.
    ///
    /// Only configuration problems are run-fatal; everything else is
    /// contained at the component that produced it. A run-fatal error
    /// skips the tick and the next tick retries from scratch.
    pub fn is_run_fatal(&self) -> bool {
        matches!(self, Error::Config(_) | Error::MissingThreshold(_))
    }

    /// Check if this error only degrades durability (the run itself
    /// completed in memory).
    pub fn is_durability_warning(&self) -> bool {
        matches!(self, Error::Persistence(_) | Error::Io(_))
    }
}

// Conversion from reqwest errors
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http(e.to_string())
    }
}

// Conversion from sqlx errors
impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        Error::Persistence(e.to_string())
    }
}

// Conversion from serde_json errors
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

// Conversion from I/O errors
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}
