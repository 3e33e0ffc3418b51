//! Structured validation results shared by every request type

use std::fmt;

use serde::Serialize;

/// A single rejected field and the reason it was rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
}

/// Collected field violations for one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.violations.push(FieldViolation {
            field: field.into(),
            reason: reason.into(),
        });
    }

    /// Record the error of a field-level check, if any
    pub fn check<E: fmt::Display>(&mut self, field: &str, result: Result<(), E>) {
        if let Err(e) = result {
            self.add(field, e.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", violation.field, violation.reason)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Check a character count against an inclusive range
pub fn check_length(value: &str, min: usize, max: usize) -> Result<(), LengthError> {
    let len = value.chars().count();

    if len < min {
        return Err(LengthError::TooShort(min));
    }

    if len > max {
        return Err(LengthError::TooLong(max));
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LengthError {
    #[error("must be at least {0} characters")]
    TooShort(usize),

    #[error("must be at most {0} characters")]
    TooLong(usize),
}
