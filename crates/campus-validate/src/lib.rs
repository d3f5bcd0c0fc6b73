//! Pre-submission validation for Campus admin forms.
//!
//! Validation is synchronous and pure. A form is submitted only when
//! [`ValidationResult::is_valid`] holds; otherwise each failing field shows
//! its own message.

pub mod checks;
pub mod result;
pub mod validator;

pub use checks::{INVALID_EMAIL, is_email};
pub use result::{InvalidForm, ValidationError, ValidationResult};
pub use validator::{FormValidator, FormValues, RuleFn, validate};
