//! Form validator.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use campus_model::{FieldSpec, Fields, item::scalar_text};
use tracing::debug;

use crate::checks::{check_kind, required_message};
use crate::result::ValidationResult;

/// Submitted form values keyed by field name.
pub type FormValues = BTreeMap<String, String>;

/// Custom predicate: returns a message when the value is rejected.
pub type RuleFn = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Validates flat forms described by [`FieldSpec`]s.
///
/// Per field, rules run in order and the first failure wins:
///
/// 1. required (empty or whitespace-only values)
/// 2. kind rules (email, number range, select option, date, text length)
/// 3. custom rules, in registration order
///
/// Empty optional fields skip every rule.
#[derive(Default)]
pub struct FormValidator {
    rules: HashMap<String, Vec<RuleFn>>,
}

impl FormValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom rule for the field `name`.
    pub fn rule<F>(mut self, name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.rules.entry(name.into()).or_default().push(Box::new(rule));
        self
    }

    /// Validate string values against `fields`.
    pub fn validate(&self, values: &FormValues, fields: &[FieldSpec]) -> ValidationResult {
        let mut result = ValidationResult::new();
        for field in fields {
            let value = values.get(&field.name).map(String::as_str).unwrap_or("");
            if let Some(message) = self.check_field(field, value) {
                result.insert(field.name.clone(), message);
            }
        }
        if !result.is_valid() {
            debug!(failed = result.len(), "Form failed validation");
        }
        result
    }

    /// Validate a JSON payload. Nulls and non-scalar values count as empty.
    pub fn validate_fields(&self, payload: &Fields, fields: &[FieldSpec]) -> ValidationResult {
        let values: FormValues = payload
            .iter()
            .filter_map(|(name, value)| scalar_text(value).map(|text| (name.clone(), text)))
            .collect();
        self.validate(&values, fields)
    }

    fn check_field(&self, field: &FieldSpec, value: &str) -> Option<String> {
        if value.trim().is_empty() {
            return field.required.then(|| required_message(field));
        }
        check_kind(field, value).or_else(|| {
            self.rules
                .get(&field.name)
                .into_iter()
                .flatten()
                .find_map(|rule| rule(value))
        })
    }
}

impl fmt::Debug for FormValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.rules.keys().collect();
        names.sort();
        f.debug_struct("FormValidator")
            .field("custom_rules", &names)
            .finish()
    }
}

/// Validate with only the built-in rules.
pub fn validate(values: &FormValues, fields: &[FieldSpec]) -> ValidationResult {
    FormValidator::new().validate(values, fields)
}
