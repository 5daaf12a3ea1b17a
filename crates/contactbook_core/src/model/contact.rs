//! Contact domain model.
//!
//! # Responsibility
//! - Define the stored `Contact` record and the `ContactInput` write shape.
//! - Enforce field bounds before anything reaches storage.
//!
//! # Invariants
//! - `first_name`/`last_name`: 1-50 chars, `email`: 1-120 chars,
//!   `phone`: 1-20 chars, `additional_data`: 0-500 chars.
//! - `birthday` is a real calendar date written as `YYYY-MM-DD`.

use crate::model::validation::{check_length, ValidationError};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static BIRTHDAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid birthday regex"));

pub const FIRST_NAME_MAX: usize = 50;
pub const LAST_NAME_MAX: usize = 50;
pub const EMAIL_MAX: usize = 120;
pub const PHONE_MAX: usize = 20;
pub const ADDITIONAL_DATA_MAX: usize = 500;

/// Storage-assigned contact identifier.
pub type ContactId = i64;

/// Stored contact row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    /// `YYYY-MM-DD`.
    pub birthday: String,
    pub additional_data: String,
}

/// Complete contact payload for create and full-replacement update.
///
/// Every key is required; there is no partial update shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birthday: String,
    pub additional_data: String,
}

impl ContactInput {
    /// Validates field bounds and the birthday format.
    ///
    /// # Errors
    /// - Returns the first violated constraint in declaration order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_length("first_name", &self.first_name, 1, FIRST_NAME_MAX)?;
        check_length("last_name", &self.last_name, 1, LAST_NAME_MAX)?;
        check_length("email", &self.email, 1, EMAIL_MAX)?;
        check_length("phone", &self.phone, 1, PHONE_MAX)?;
        parse_birthday(&self.birthday)?;
        check_length("additional_data", &self.additional_data, 0, ADDITIONAL_DATA_MAX)?;
        Ok(())
    }
}

/// Parses a `YYYY-MM-DD` birthday, rejecting non-padded or impossible dates.
pub fn parse_birthday(value: &str) -> Result<NaiveDate, ValidationError> {
    if !BIRTHDAY_RE.is_match(value) {
        return Err(ValidationError::InvalidBirthday(value.to_string()));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidBirthday(value.to_string()))
}
