use std::path::PathBuf;

use crate::types::TokenFingerprint;

/// Result type alias for rolegate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by the identity service client.
///
/// This is the error surface of the injected [`crate::IdentityClient`]. It is
/// `Clone + PartialEq` so a failure can be handed back to the caller verbatim
/// and compared in tests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The identity service rejected the token
    #[error("token rejected: {reason}")]
    Unauthenticated { reason: String },

    /// The request never produced a response
    #[error("request to '{endpoint}' failed: {message}")]
    Transport { endpoint: String, message: String },

    /// The identity service answered with an error status
    #[error("identity service returned status {code}: {message}")]
    Status { code: u16, message: String },
}

impl ClientError {
    #[must_use]
    pub fn unauthenticated(reason: impl Into<String>) -> Self {
        ClientError::Unauthenticated {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn transport(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        ClientError::Transport {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn status(code: u16, message: impl Into<String>) -> Self {
        ClientError::Status {
            code,
            message: message.into(),
        }
    }
}

/// Core error type for rolegate operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Token authentication failed; nothing was cached
    #[error("authentication failed for token {fingerprint}: {source}")]
    Authentication {
        fingerprint: TokenFingerprint,
        #[source]
        source: ClientError,
    },

    /// Resource listing failed after a successful authentication; nothing was cached
    #[error("failed to list accessible resources for '{username}': {source}")]
    ResourceListing {
        username: String,
        #[source]
        source: ClientError,
    },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// File system operations
    #[error("file system {operation} operation failed for '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json {
            message: error.to_string(),
            source: error,
        }
    }
}

// Helper methods for creating errors with context
impl Error {
    /// Create an authentication error wrapping the client's failure
    #[must_use]
    pub fn authentication(fingerprint: TokenFingerprint, source: ClientError) -> Self {
        Error::Authentication {
            fingerprint,
            source,
        }
    }

    /// Create a resource listing error wrapping the client's failure
    #[must_use]
    pub fn resource_listing(username: impl Into<String>, source: ClientError) -> Self {
        Error::ResourceListing {
            username: username.into(),
            source,
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a file system error
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// The identity service failure behind this error, exactly as the client reported it.
    ///
    /// Only the two failures that cross the resolution boundary carry one.
    #[must_use]
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            Error::Authentication { source, .. } | Error::ResourceListing { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}
