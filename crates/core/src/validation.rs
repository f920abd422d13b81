//! Shared helpers for the pure validation functions in this crate.
//!
//! Field-level constraints (ranges, lengths) are declared on the input DTOs
//! with `validator` derives; required-field and enum checks live next to the
//! types they guard.

use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

/// Trim a caller-supplied string, treating whitespace-only input as absent.
pub fn normalize_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Treat only a missing or empty string as absent. Enum-valued fields go
/// through this so padded input still fails the domain check.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Deserialize a clearable field: an absent key stays `None`, an explicit
/// `null` becomes `Some(None)`. Pair with `#[serde(default)]`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Normalize a clearable text field. A `null` or blank value clears it.
pub fn clearable_text(value: &Option<Option<String>>) -> Option<Option<String>> {
    value.as_ref().map(|v| normalize_text(v.as_deref()))
}

/// Length check for fields the `validator` derive does not see.
pub fn check_max_chars(value: Option<&str>, max: usize, message: &str) -> Result<(), CoreError> {
    match value {
        Some(v) if v.chars().count() > max => Err(CoreError::Validation(message.to_string())),
        _ => Ok(()),
    }
}

/// Run the declarative `validator` constraints on an input DTO.
pub fn check_constraints<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(constraint_message(&errors)))
}

/// Flatten `validator` errors into one deterministic, human-readable message.
fn constraint_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("Invalid value for {field}"),
            })
        })
        .collect();
    messages.sort();
    messages.dedup();
    messages.join("; ")
}
