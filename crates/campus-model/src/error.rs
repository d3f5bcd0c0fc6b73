//! Model error types.

use thiserror::Error;

/// Errors raised while converting raw payloads into model types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModelError {
    /// A record was not a JSON object.
    #[error("expected a JSON object, found {found}")]
    NotAnObject {
        /// JSON type that was found instead.
        found: &'static str,
    },

    /// A record carried neither `id` nor `_id`.
    #[error("record has no usable id")]
    MissingId,
}

/// Result type alias for model conversions.
pub type Result<T> = std::result::Result<T, ModelError>;
