//! Validation errors for contact input and list queries.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Client-side input error raised before any storage access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field length (in characters) is outside `[min, max]`.
    FieldLength {
        field: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },
    /// Birthday is not a real calendar date in `YYYY-MM-DD` form.
    InvalidBirthday(String),
    /// Paging parameter is below 1.
    InvalidPaging { field: &'static str, value: i64 },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldLength {
                field,
                min,
                max,
                actual,
            } => write!(
                f,
                "{field} must be between {min} and {max} characters, got {actual}"
            ),
            Self::InvalidBirthday(value) => {
                write!(f, "birthday `{value}` is not a valid YYYY-MM-DD date")
            }
            Self::InvalidPaging { field, value } => {
                write!(f, "{field} must be greater than or equal to 1, got {value}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Checks that `value` has between `min` and `max` characters inclusive.
pub(crate) fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual < min || actual > max {
        return Err(ValidationError::FieldLength {
            field,
            min,
            max,
            actual,
        });
    }
    Ok(())
}
