//! Error types for backoffice wiring.

use std::path::PathBuf;

use campus_source::AdapterError;
use thiserror::Error;

/// Errors raised while loading configuration or building adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse fixtures {path}: {source}")]
    Fixtures {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {message}")]
    InvalidConfig { message: String },

    #[error("unknown resource: {name}")]
    UnknownResource { name: String },

    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

impl AppError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Text suitable for a startup error dialog.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io { path, .. } => format!("Could not read {}.", path.display()),
            Self::Toml { path, .. } => {
                format!("The configuration file {} is not valid TOML.", path.display())
            }
            Self::Fixtures { path, .. } => {
                format!("The fixture file {} is not valid JSON.", path.display())
            }
            Self::InvalidConfig { message } => format!("Configuration problem: {message}."),
            Self::UnknownResource { name } => format!("No list is configured for '{name}'."),
            Self::Adapter(error) => error.user_message().to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
