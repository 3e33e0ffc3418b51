//! Team validation

use thiserror::Error;

use crate::domain::validation::{check_length, LengthError};

/// Errors that can occur during team validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TeamValidationError {
    #[error("is required")]
    Required,

    #[error("{0}")]
    Length(#[from] LengthError),

    #[error("must be one of: project_manager, developer")]
    InvalidRole,
}

pub const MIN_TEAM_NAME_LENGTH: usize = 2;
pub const MAX_TEAM_NAME_LENGTH: usize = 50;

/// Validate a team name (2 to 50 characters)
pub fn validate_team_name(name: &str) -> Result<(), TeamValidationError> {
    if name.is_empty() {
        return Err(TeamValidationError::Required);
    }

    check_length(name, MIN_TEAM_NAME_LENGTH, MAX_TEAM_NAME_LENGTH)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_team_name() {
        assert!(validate_team_name("Core").is_ok());
        assert!(validate_team_name("ab").is_ok());
        assert_eq!(validate_team_name(""), Err(TeamValidationError::Required));
        assert_eq!(
            validate_team_name("a"),
            Err(TeamValidationError::Length(LengthError::TooShort(2)))
        );
        assert_eq!(
            validate_team_name(&"a".repeat(51)),
            Err(TeamValidationError::Length(LengthError::TooLong(50)))
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TeamValidationError::InvalidRole.to_string(),
            "must be one of: project_manager, developer"
        );
        assert_eq!(
            validate_team_name("a").unwrap_err().to_string(),
            "must be at least 2 characters"
        );
    }
}
