//! Built-in field checks.
//!
//! Each check looks at one non-empty value and returns the message of the
//! first rule it breaks.

use std::sync::LazyLock;

use campus_model::{FieldKind, FieldSpec};
use chrono::NaiveDate;
use regex::Regex;

/// Message for a malformed email address.
pub const INVALID_EMAIL: &str = "invalid email";

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"));

/// Whether `value` has the `local@domain.tld` shape.
pub fn is_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Message for an empty required field.
pub fn required_message(field: &FieldSpec) -> String {
    format!("{} is required", field.display_label())
}

/// Run the kind-specific rules for `field` on a non-empty `value`.
pub fn check_kind(field: &FieldSpec, value: &str) -> Option<String> {
    let label = field.display_label();
    match field.kind {
        FieldKind::Email => (!is_email(value)).then(|| INVALID_EMAIL.to_string()),
        FieldKind::Number => check_number(field, label, value),
        FieldKind::Select => check_option(field, label, value),
        FieldKind::Date => check_date(label, value),
        FieldKind::Text | FieldKind::Textarea => check_length(field, label, value),
    }
}

fn check_number(field: &FieldSpec, label: &str, value: &str) -> Option<String> {
    let Some(number) = value.trim().parse::<f64>().ok().filter(|n| n.is_finite()) else {
        return Some(format!("{label} must be a number"));
    };
    if let Some(min) = field.min
        && number < min
    {
        return Some(format!("{label} must be at least {min}"));
    }
    if let Some(max) = field.max
        && number > max
    {
        return Some(format!("{label} must be at most {max}"));
    }
    None
}

fn check_option(field: &FieldSpec, label: &str, value: &str) -> Option<String> {
    let options = field.options.as_ref()?;
    let known = options.iter().any(|option| option.value == value);
    (!known).then(|| format!("{label} has an unknown option"))
}

fn check_date(label: &str, value: &str) -> Option<String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .is_err()
        .then(|| format!("{label} must be a valid date"))
}

fn check_length(field: &FieldSpec, label: &str, value: &str) -> Option<String> {
    let limit = field.max_length?;
    (value.chars().count() > limit)
        .then(|| format!("{label} must be at most {limit} characters"))
}

#[cfg(test)]
mod tests {
    use campus_model::SelectOption;

    use super::*;

    #[test]
    fn test_email_shape() {
        assert!(is_email("ada@example.com"));
        assert!(is_email("a.b+c@sub.example.org"));
        assert!(!is_email("bad"));
        assert!(!is_email("no@tld"));
        assert!(!is_email("two words@example.com"));
        assert!(!is_email("a@@example.com"));
    }

    #[test]
    fn test_number_range() {
        let age = FieldSpec::number("age").with_label("Age").with_range(Some(18.0), Some(99.0));
        assert_eq!(check_kind(&age, "42"), None);
        assert_eq!(check_kind(&age, "abc").as_deref(), Some("Age must be a number"));
        assert_eq!(check_kind(&age, "NaN").as_deref(), Some("Age must be a number"));
        assert_eq!(
            check_kind(&age, "17").as_deref(),
            Some("Age must be at least 18")
        );
        assert_eq!(
            check_kind(&age, "99.5").as_deref(),
            Some("Age must be at most 99")
        );
    }

    #[test]
    fn test_select_options() {
        let level = FieldSpec::select(
            "level",
            vec![
                SelectOption::new("beginner", "Beginner"),
                SelectOption::new("advanced", "Advanced"),
            ],
        );
        assert_eq!(check_kind(&level, "beginner"), None);
        assert_eq!(
            check_kind(&level, "expert").as_deref(),
            Some("level has an unknown option")
        );
    }

    #[test]
    fn test_date_format() {
        let start = FieldSpec::new("startDate", FieldKind::Date).with_label("Start date");
        assert_eq!(check_kind(&start, "2024-02-29"), None);
        assert_eq!(
            check_kind(&start, "2023-02-29").as_deref(),
            Some("Start date must be a valid date")
        );
        assert_eq!(
            check_kind(&start, "29/02/2024").as_deref(),
            Some("Start date must be a valid date")
        );
    }

    #[test]
    fn test_text_length_counts_characters() {
        let title = FieldSpec::text("title").with_max_length(5);
        assert_eq!(check_kind(&title, "héllo"), None);
        assert_eq!(
            check_kind(&title, "héllo!").as_deref(),
            Some("title must be at most 5 characters")
        );
    }
}
