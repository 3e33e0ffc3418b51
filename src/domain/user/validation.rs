//! User field validation

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::domain::validation::{check_length, LengthError};

/// Errors that can occur during user field validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("is required")]
    Required,

    #[error("must be a valid email address")]
    InvalidEmail,

    #[error("must be at most {0} characters")]
    EmailTooLong(usize),

    #[error("{0}")]
    Length(#[from] LengthError),
}

pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MIN_NAME_LENGTH: usize = 2;
pub const MAX_NAME_LENGTH: usize = 50;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 150;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Validate an email address
///
/// Rules:
/// - Cannot be empty
/// - Maximum 254 characters
/// - `local@domain.tld` shape
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.is_empty() {
        return Err(UserValidationError::Required);
    }

    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(UserValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(UserValidationError::InvalidEmail);
    }

    Ok(())
}

/// Validate a user name (2 to 50 characters)
pub fn validate_user_name(name: &str) -> Result<(), UserValidationError> {
    if name.is_empty() {
        return Err(UserValidationError::Required);
    }

    check_length(name, MIN_NAME_LENGTH, MAX_NAME_LENGTH)?;
    Ok(())
}

/// Validate a plaintext password (8 to 150 characters)
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.is_empty() {
        return Err(UserValidationError::Required);
    }

    check_length(password, MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH)?;
    Ok(())
}
