//! Adapter error types.

use campus_model::{ItemId, ModelError};
use thiserror::Error;

/// Errors surfaced by a data source adapter.
///
/// Reads are expected to degrade to an empty page when they see one of
/// these; writes hand them to the caller for display.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AdapterError {
    /// The request never produced a response (connection, DNS, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("server responded with status {status}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The response could not be interpreted.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// The targeted item does not exist.
    #[error("item not found: {id}")]
    NotFound {
        /// Id that was looked up.
        id: ItemId,
    },

    /// The adapter was built from unusable settings.
    #[error("invalid adapter configuration: {0}")]
    Config(String),
}

impl AdapterError {
    /// HTTP status of the failure, when the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected the credentials.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Returns a user-friendly error message suitable for display in the UI.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Network(_) => "Could not reach the server. Please check your connection.",
            Self::Http { status: 401, .. } => "Your session has expired. Please sign in again.",
            Self::Http { status: 403, .. } => "You do not have permission to do this.",
            Self::Http { status, .. } if *status >= 500 => {
                "The server ran into a problem. Please try again later."
            }
            Self::Http { .. } => "The server rejected the request.",
            Self::NotFound { .. } => "The item no longer exists.",
            Self::Decode(_) | Self::Config(_) => "An unexpected error occurred.",
        }
    }
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<ModelError> for AdapterError {
    fn from(err: ModelError) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = AdapterError::Network("connection refused".to_string());
        assert!(err.user_message().contains("connection"));

        let err = AdapterError::Http {
            status: 401,
            body: String::new(),
        };
        assert!(err.is_unauthorized());
        assert!(err.user_message().contains("sign in"));

        let err = AdapterError::Http {
            status: 503,
            body: "down".to_string(),
        };
        assert_eq!(err.status(), Some(503));
        assert!(err.user_message().contains("try again later"));
    }

    #[test]
    fn test_model_error_is_decode() {
        let err: AdapterError = ModelError::MissingId.into();
        assert!(matches!(err, AdapterError::Decode(_)));
        assert_eq!(err.status(), None);
    }
}
