//! Error types for shelf-core

use thiserror::Error;

/// Result type alias using shelf-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in shelf-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Script not found, locally or remotely
    #[error("Script not found: {0}")]
    NotFound(String),

    /// A script with this name already exists on the server
    #[error("Script name already exists: {0}")]
    Duplicate(String),

    /// Invalid input (bad name, oversized content, malformed request)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Bad or missing credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Structured server-side failure that does not map to a more
    /// specific variant. `warning` marks soft validation failures such
    /// as a name shadowing a common system command.
    #[error("{message} (HTTP {status})")]
    Api {
        message: String,
        status: u16,
        warning: bool,
    },

    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Local cache read/write error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this is a warning-class server rejection rather than a
    /// hard failure.
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::Api { warning: true, .. })
    }
}
