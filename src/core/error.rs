//! Error types for the plugin host and codecs.

use thiserror::Error;

/// Result type alias for plugin host operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in plugin host operations.
#[derive(Error, Debug)]
pub enum Error {
    // Registry errors
    #[error("Invalid plugin: {0}")]
    InvalidPlugin(String),

    #[error("Plugin not found: {0}")]
    PluginNotFound(String),

    #[error("No registered plugin handles format '{0}'")]
    UnsupportedFormat(String),

    // Import security errors
    #[error("Input of {size} bytes exceeds the {limit} byte import limit")]
    OversizedInput { size: usize, limit: usize },

    #[error("Forbidden content in import: {0}")]
    ForbiddenContent(String),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // Host errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Operation already in progress: {0}")]
    OperationInProgress(String),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is an import-time security rejection.
    pub fn is_security_rejection(&self) -> bool {
        matches!(
            self,
            Error::OversizedInput { .. } | Error::ForbiddenContent(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::MalformedDocument(err.to_string())
    }
}

impl From<quick_xml::escape::EscapeError> for Error {
    fn from(err: quick_xml::escape::EscapeError) -> Self {
        Error::MalformedDocument(err.to_string())
    }
}
