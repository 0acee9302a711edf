use std::collections::BTreeMap;

use serde::Serialize;

use super::email::EmailFormatValidator;
use super::fields::COLOR_OPTIONS;

pub const MIN_TITLE_CHARS: usize = 5;
/// Column bound of the varchar(255) text columns.
pub const MAX_FIELD_CHARS: usize = 255;

/// Raw field values for one submission attempt, keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct SubmissionInput {
    values: BTreeMap<String, String>,
}

impl SubmissionInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, S)> for SubmissionInput {
    fn from_iter<I: IntoIterator<Item = (S, S)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// One field-keyed rejection reason. Returned as data, never thrown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Apply the submission rules. Every rule runs; all resulting errors are
/// collected. Pure: same input, same error set.
pub fn validate(
    input: &SubmissionInput,
    email_validator: &dyn EmailFormatValidator,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let title = input.value("title").unwrap_or("");
    if title.chars().count() < MIN_TITLE_CHARS {
        errors.push(ValidationError::new(
            "title",
            "The title must be at least 5 characters long.",
        ));
    } else if title.chars().count() > MAX_FIELD_CHARS {
        errors.push(ValidationError::new(
            "title",
            "The title must be at most 255 characters long.",
        ));
    }

    let address = input.value("user_email").unwrap_or("");
    if !email_validator.is_valid(address) {
        errors.push(ValidationError::new(
            "user_email",
            format!("{address} is not a valid email address."),
        ));
    }

    let username = input.value("username").unwrap_or("");
    if username.chars().count() > MAX_FIELD_CHARS {
        errors.push(ValidationError::new(
            "username",
            "The username must be at most 255 characters long.",
        ));
    }

    // The record stores the color as one of the declared option codes; a
    // present value outside that set must not be coerced silently.
    if let Some(raw) = input.value("color") {
        if !raw.is_empty() && !COLOR_OPTIONS.iter().any(|(value, _)| *value == raw) {
            errors.push(ValidationError::new(
                "color",
                format!("{raw} is not a valid color choice."),
            ));
        }
    }

    errors
}
