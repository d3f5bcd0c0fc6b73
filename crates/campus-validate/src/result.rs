//! Validation outcome.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// One field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

/// Per-field messages in form order. A field without an entry is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`. Only the first message per field is kept.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        if self.get(&field).is_none() {
            self.errors.push(ValidationError {
                field,
                message: message.into(),
            });
        }
    }

    /// Message for `field`, if it failed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Field name to message.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.errors
            .iter()
            .map(|error| (error.field.clone(), error.message.clone()))
            .collect()
    }

    /// Gate a submission: `Ok` only when every field passed.
    pub fn ensure_valid(self) -> Result<(), InvalidForm> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(InvalidForm {
                errors: self.errors,
            })
        }
    }
}

/// A submission blocked by field errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct InvalidForm {
    pub errors: Vec<ValidationError>,
}

impl InvalidForm {
    /// Text suitable for a form banner; per-field messages stay on the fields.
    pub fn user_message(&self) -> String {
        match self.errors.len() {
            1 => "Please fix the highlighted field.".to_string(),
            n => format!("Please fix the {n} highlighted fields."),
        }
    }
}
