use thiserror::Error;

use crate::domain::store::StoreError;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid argument '{name}': {message}")]
    InvalidArgument { name: String, message: String },

    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("Email already exists.")]
    EmailAlreadyExists { email: String },

    #[error("User with ID {id} not found.")]
    UserNotFound { id: i64 },

    #[error("Log with ID {id} not found.")]
    LogNotFound { id: i64 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Coarse classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    ValidationFailed,
    NotFound,
    Internal,
}

impl DomainError {
    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn email_already_exists(email: impl Into<String>) -> Self {
        Self::EmailAlreadyExists {
            email: email.into(),
        }
    }

    pub fn user_not_found(id: i64) -> Self {
        Self::UserNotFound { id }
    }

    pub fn log_not_found(id: i64) -> Self {
        Self::LogNotFound { id }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::Validation { .. } | Self::EmailAlreadyExists { .. } => {
                ErrorKind::ValidationFailed
            }
            Self::UserNotFound { .. } | Self::LogNotFound { .. } => ErrorKind::NotFound,
            Self::Store(_) => ErrorKind::Internal,
        }
    }

    /// Name of the offending input field, if the error is about one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field.as_str()),
            Self::EmailAlreadyExists { .. } => Some("Email"),
            Self::InvalidArgument { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(
            DomainError::invalid_argument("action", "empty").kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            DomainError::validation("Forename", "Forename is required").kind(),
            ErrorKind::ValidationFailed
        );
        assert_eq!(
            DomainError::email_already_exists("a@b.c").kind(),
            ErrorKind::ValidationFailed
        );
        assert_eq!(DomainError::user_not_found(1).kind(), ErrorKind::NotFound);
        assert_eq!(DomainError::log_not_found(1).kind(), ErrorKind::NotFound);
        let store = StoreError::Backend(anyhow::anyhow!("disk on fire"));
        assert_eq!(DomainError::from(store).kind(), ErrorKind::Internal);
    }

    #[test]
    fn messages() {
        assert_eq!(
            DomainError::email_already_exists("x@example.com").to_string(),
            "Email already exists."
        );
        assert_eq!(
            DomainError::user_not_found(42).to_string(),
            "User with ID 42 not found."
        );
        assert_eq!(
            DomainError::validation("Surname", "Surname must contain only letters").to_string(),
            "Surname must contain only letters"
        );
    }

    #[test]
    fn store_errors_pass_through_unchanged() {
        let err = DomainError::from(StoreError::Backend(anyhow::anyhow!("connection reset")));
        assert_eq!(err.to_string(), "connection reset");
        assert!(err.field().is_none());
    }
}
