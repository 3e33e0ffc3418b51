use thiserror::Error;

use super::validation::ValidationErrors;

/// Error category consumed by the transport layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Internal,
}

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    #[error("Invalid ID format: {message}")]
    InvalidId { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Validation failure on a single field
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, reason);
        Self::Validation(errors)
    }

    pub fn invalid_id(message: impl Into<String>) -> Self {
        Self::InvalidId {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::InvalidId { .. } => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Internal { .. } | Self::Storage { .. } => ErrorKind::Internal,
        }
    }

    /// Message that is safe to show to API clients.
    ///
    /// Internal and storage failures never expose their detail.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(errors) => errors.to_string(),
            Self::InvalidId { message }
            | Self::NotFound { message }
            | Self::Conflict { message } => message.clone(),
            Self::Internal { .. } | Self::Storage { .. } => {
                "Unexpected error occurred!".to_string()
            }
        }
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Team with id 42 was not found!");
        assert_eq!(error.to_string(), "Not found: Team with id 42 was not found!");
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("username", "is required");
        assert_eq!(error.to_string(), "Validation error: username: is required");
        assert_eq!(error.kind(), ErrorKind::Validation);
        assert_eq!(error.public_message(), "username: is required");
    }

    #[test]
    fn test_conflict_error() {
        let error = DomainError::conflict("User is already a member of this team");
        assert_eq!(error.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_internal_errors_hide_detail() {
        let storage = DomainError::storage("connection refused on 10.0.0.3");
        let internal = DomainError::internal("argon2 failure");

        assert_eq!(storage.kind(), ErrorKind::Internal);
        assert_eq!(internal.kind(), ErrorKind::Internal);
        assert_eq!(storage.public_message(), "Unexpected error occurred!");
        assert!(!internal.public_message().contains("argon2"));
    }

    #[test]
    fn test_invalid_id_is_validation_kind() {
        let error = DomainError::invalid_id("Invalid UUID!");
        assert_eq!(error.kind(), ErrorKind::Validation);
        assert_eq!(error.public_message(), "Invalid UUID!");
    }
}
