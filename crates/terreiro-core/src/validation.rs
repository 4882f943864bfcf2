#![forbid(unsafe_code)]

//! Testimonial and form completeness validation.

use std::fmt;

use crate::testimonial::Testimonial;

// ---------------------------------------------------------------------------
// Error Codes
// ---------------------------------------------------------------------------

/// The testimonial has no message text.
pub const ERROR_CODE_MISSING_MESSAGE: &str = "missing_message";
/// No star was selected.
pub const ERROR_CODE_MISSING_RATING: &str = "missing_rating";
/// The rating is above the star count.
pub const ERROR_CODE_RATING_RANGE: &str = "rating_range";

/// Highest selectable rating.
pub const MAX_RATING: u8 = 5;

/// A validation failure with a stable code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// The result of a validation operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValidationResult {
    #[default]
    Valid,
    Invalid(ValidationError),
}

impl ValidationResult {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    #[must_use]
    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            Self::Valid => None,
            Self::Invalid(e) => Some(e),
        }
    }

    /// Convert into a `Result` for `?` propagation.
    pub fn into_result(self) -> Result<(), ValidationError> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(e) => Err(e),
        }
    }
}

/// Check that a testimonial may be dispatched.
///
/// Requires a non-empty message and a rating in `1..=5`. The message is not
/// trimmed: whitespace counts as content.
#[must_use]
pub fn validate_testimonial(testimonial: &Testimonial) -> ValidationResult {
    if testimonial.message.is_empty() {
        return ValidationResult::Invalid(ValidationError::new(
            ERROR_CODE_MISSING_MESSAGE,
            "testimonial message is empty",
        ));
    }
    match testimonial.rating {
        0 => ValidationResult::Invalid(ValidationError::new(
            ERROR_CODE_MISSING_RATING,
            "no rating selected",
        )),
        r if r > MAX_RATING => ValidationResult::Invalid(ValidationError::new(
            ERROR_CODE_RATING_RANGE,
            format!("rating {r} exceeds {MAX_RATING}"),
        )),
        _ => ValidationResult::Valid,
    }
}

/// One form control as seen by [`validate_form`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormControl {
    pub required: bool,
    pub value: String,
}

impl FormControl {
    #[must_use]
    pub fn new(required: bool, value: impl Into<String>) -> Self {
        Self {
            required,
            value: value.into(),
        }
    }
}

/// Every required control has a non-blank value.
#[must_use]
pub fn validate_form(controls: &[FormControl]) -> bool {
    controls
        .iter()
        .filter(|c| c.required)
        .all(|c| !c.value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn testimonial(message: &str, rating: u8) -> Testimonial {
        Testimonial {
            name: "Maria".into(),
            service: "Jogo de Búzios".into(),
            message: message.into(),
            rating,
            timestamp: FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn accepts_complete_testimonial() {
        assert!(validate_testimonial(&testimonial("Grata", 4)).is_valid());
    }

    #[test]
    fn rejects_empty_message() {
        let result = validate_testimonial(&testimonial("", 5));
        assert_eq!(result.error().unwrap().code, ERROR_CODE_MISSING_MESSAGE);
    }

    #[test]
    fn rejects_zero_rating() {
        let result = validate_testimonial(&testimonial("Grata", 0));
        assert_eq!(result.error().unwrap().code, ERROR_CODE_MISSING_RATING);
    }

    #[test]
    fn rejects_out_of_range_rating() {
        let result = validate_testimonial(&testimonial("Grata", 6));
        assert!(result.is_invalid());
        assert_eq!(result.error().unwrap().code, ERROR_CODE_RATING_RANGE);
    }

    #[test]
    fn whitespace_message_counts_as_content() {
        assert!(validate_testimonial(&testimonial(" ", 1)).is_valid());
    }

    #[test]
    fn into_result_carries_error() {
        let err = validate_testimonial(&testimonial("", 0))
            .into_result()
            .unwrap_err();
        assert_eq!(err.to_string(), "missing_message: testimonial message is empty");
    }

    #[test]
    fn form_requires_non_blank_required_fields() {
        assert!(validate_form(&[
            FormControl::new(true, "Maria"),
            FormControl::new(false, ""),
        ]));
        assert!(!validate_form(&[
            FormControl::new(true, "Maria"),
            FormControl::new(true, "   "),
        ]));
    }

    #[test]
    fn empty_form_is_valid() {
        assert!(validate_form(&[]));
    }
}
