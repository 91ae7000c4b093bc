//! Error types for the work-item model
//!
//! Every constructor in this crate returns a [`ValidationError`] rather than
//! letting an out-of-range field propagate. The error carries the offending
//! field name and the violated constraint so callers (and logs) can point at
//! the exact problem.

/// A constructed entity violates a model invariant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// String field length outside its allowed range
    #[error("{field} must be {min}-{max} characters (got {actual})")]
    LengthOutOfRange {
        /// Offending field
        field: &'static str,
        /// Minimum length (inclusive)
        min: usize,
        /// Maximum length (inclusive)
        max: usize,
        /// Actual length supplied
        actual: usize,
    },

    /// List field below its minimum entry count
    #[error("{field} requires at least {min} entries (got {actual})")]
    TooFewEntries {
        /// Offending field
        field: &'static str,
        /// Minimum entry count
        min: usize,
        /// Actual entry count supplied
        actual: usize,
    },

    /// Required string field is empty or whitespace-only
    #[error("{field} must not be empty")]
    MissingField {
        /// Offending field
        field: &'static str,
    },

    /// Enum-like field received a value outside its closed set
    #[error("{field} does not allow value '{value}'")]
    InvalidValue {
        /// Offending field
        field: &'static str,
        /// Rejected value
        value: String,
    },

    /// Project key does not match `^[A-Z][A-Z0-9]{1,9}$`
    #[error("project key '{key}' must be one uppercase letter followed by 1-9 uppercase alphanumerics")]
    InvalidProjectKey {
        /// Rejected key
        key: String,
    },
}

/// Check a string field against a length range
pub(crate) fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual < min || actual > max {
        return Err(ValidationError::LengthOutOfRange {
            field,
            min,
            max,
            actual,
        });
    }
    Ok(())
}

/// Check a list field against a minimum entry count
pub(crate) fn check_min_entries<T>(
    field: &'static str,
    entries: &[T],
    min: usize,
) -> Result<(), ValidationError> {
    if entries.len() < min {
        return Err(ValidationError::TooFewEntries {
            field,
            min,
            actual: entries.len(),
        });
    }
    Ok(())
}

/// Check a required string field is non-blank
pub(crate) fn check_required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(())
}
