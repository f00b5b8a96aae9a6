//! Error types for the SiteMirror client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for every SiteMirror crate.
///
/// Transport and status failures are split so callers can tell
/// "the server never answered" from "the server said no". HTML decoding
/// has no variant here: decoders degrade to empty results instead of failing.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MirrorError {
    /// No response was received (DNS, refused connection, reset, ...)
    #[error("Connectivity error: {message}")]
    Connectivity { message: String },

    /// A response arrived with a non-success status other than 401
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },

    /// The server rejected the session; the local session has been cleared
    #[error("Unauthorized")]
    Unauthorized,

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Persisted session storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Client-side input validation failed before anything was sent
    #[error("{0}")]
    Validation(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MirrorError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Connectivity error
    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::Connectivity {
            message: message.into(),
        }
    }

    /// Creates an Http error for the given status code
    pub fn http(status: u16) -> Self {
        Self::Http { status }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if the server reported the session as invalid
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Check if this is a transport failure
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity { .. })
    }

    /// Check if this is a non-success status error
    pub fn is_http(&self) -> bool {
        matches!(self, Self::Http { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns the HTTP status carried by this error, if any.
    ///
    /// `Unauthorized` reports 401 so callers that only care about the
    /// status code do not need a separate branch.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status } => Some(*status),
            Self::Unauthorized => Some(401),
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for MirrorError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for MirrorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for MirrorError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for MirrorError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, MirrorError>`.
pub type Result<T> = std::result::Result<T, MirrorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_helpers() {
        assert_eq!(MirrorError::http(500).status(), Some(500));
        assert_eq!(MirrorError::Unauthorized.status(), Some(401));
        assert_eq!(MirrorError::connectivity("refused").status(), None);
    }

    #[test]
    fn test_display_matches_http_contract() {
        assert_eq!(MirrorError::http(404).to_string(), "HTTP error! status: 404");
        assert_eq!(MirrorError::Unauthorized.to_string(), "Unauthorized");
    }

    #[test]
    fn test_io_conversion_keeps_kind() {
        let err: MirrorError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope").into();
        match err {
            MirrorError::Io { message } => assert!(message.contains("PermissionDenied")),
            other => panic!("Expected Io error, got {other:?}"),
        }
    }
}
