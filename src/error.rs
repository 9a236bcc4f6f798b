//! Error types for manifest operations.
//!
//! All variants carry owned strings so the error is `Clone`: one load or
//! save outcome is broadcast to every caller coalesced onto it.

use std::fmt;

/// Result type for manifest operations.
pub type ManifestResult<T> = std::result::Result<T, ManifestError>;

/// Errors that can occur while loading, querying or persisting the index.
#[derive(Clone, Debug)]
pub enum ManifestError {
    /// Remote object was not found.
    ObjectNotFound {
        /// The key that was not found.
        key: String,
    },

    /// Remote store operation failed.
    Transport {
        /// Description of the operation that failed.
        operation: String,
        /// The key involved.
        key: String,
        /// The underlying error message.
        message: String,
    },

    /// Persisted snapshot is malformed.
    Decode {
        /// Description of the decoding error.
        message: String,
    },

    /// A date passed to the facade does not have the `YYYY-MM-DD` shape.
    InvalidDate {
        /// The rejected value.
        value: String,
    },

    /// Both load paths failed with no data applied.
    AllSourcesFailed {
        /// Why the snapshot path failed.
        snapshot: String,
        /// Why the listing path failed.
        listing: String,
    },

    /// Generic internal error.
    Internal {
        /// Error message.
        message: String,
    },
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestError::ObjectNotFound { key } => {
                write!(f, "remote object not found: {}", key)
            }
            ManifestError::Transport {
                operation,
                key,
                message,
            } => {
                write!(f, "remote {} failed for '{}': {}", operation, key, message)
            }
            ManifestError::Decode { message } => {
                write!(f, "invalid snapshot: {}", message)
            }
            ManifestError::InvalidDate { value } => {
                write!(f, "not a YYYY-MM-DD date: '{}'", value)
            }
            ManifestError::AllSourcesFailed { snapshot, listing } => {
                write!(
                    f,
                    "load failed on both sources (snapshot: {}; listing: {})",
                    snapshot, listing
                )
            }
            ManifestError::Internal { message } => {
                write!(f, "internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for ManifestError {}

impl From<serde_json::Error> for ManifestError {
    fn from(e: serde_json::Error) -> Self {
        ManifestError::Decode {
            message: e.to_string(),
        }
    }
}

impl ManifestError {
    /// Create a transport error.
    pub fn transport(
        operation: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ManifestError::Transport {
            operation: operation.into(),
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ManifestError::Internal {
            message: message.into(),
        }
    }

    /// True if the error is a missing-object condition rather than a
    /// transport or decoding failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ManifestError::ObjectNotFound { .. })
    }
}
