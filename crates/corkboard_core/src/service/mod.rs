//! Use-case services consumed by an API layer.
//!
//! # Responsibility
//! - Orchestrate repository calls into caller-scoped use cases.
//! - Apply the ownership guard before touching a specific note.
//! - Collapse repository errors into the external taxonomy
//!   (`NotFound`, `Conflict`, `Validation`, `Unauthorized`, `Internal`).
//!
//! # Invariants
//! - A note owned by someone else is reported exactly like a missing note.
//! - Service errors never carry note content or password material.

use crate::auth::CredentialError;
use crate::model::note::NoteId;
use crate::model::user::UserId;
use crate::model::ValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod note_service;
pub mod ownership;
pub mod user_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Externally visible error class, with a fixed status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Validation,
    Unauthorized,
    Internal,
}

impl ErrorKind {
    /// HTTP-equivalent status code for this class.
    pub fn status_code(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::Validation => 422,
            Self::Unauthorized => 401,
            Self::Internal => 500,
        }
    }
}

/// Service error for note and user use cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Note is missing or not owned by the caller.
    NoteNotFound(NoteId),
    UserNotFound(UserId),
    UsernameTaken(String),
    EmailTaken(String),
    TagConflict(String),
    Validation(ValidationError),
    /// Unknown username or wrong password; never says which.
    InvalidCredentials,
    Credential(CredentialError),
    /// Persistence failure with no domain meaning.
    Repo(RepoError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoteNotFound(_) | Self::UserNotFound(_) => ErrorKind::NotFound,
            Self::UsernameTaken(_) | Self::EmailTaken(_) | Self::TagConflict(_) => {
                ErrorKind::Conflict
            }
            Self::Validation(_) => ErrorKind::Validation,
            Self::InvalidCredentials => ErrorKind::Unauthorized,
            Self::Credential(_) | Self::Repo(_) => ErrorKind::Internal,
        }
    }

    /// Fixed message safe to show to API clients.
    pub fn public_message(&self) -> String {
        match self {
            Self::NoteNotFound(_) => "Note not found or access denied".to_string(),
            Self::UserNotFound(_) => "User not found".to_string(),
            Self::UsernameTaken(_) => "Username already taken".to_string(),
            Self::EmailTaken(_) => "Email already registered".to_string(),
            Self::TagConflict(_) => "Tag could not be saved, please retry".to_string(),
            Self::Validation(err) => err.to_string(),
            Self::InvalidCredentials => "Incorrect username or password".to_string(),
            Self::Credential(_) | Self::Repo(_) => "Internal server error".to_string(),
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::UsernameTaken(username) => write!(f, "username already taken: {username}"),
            Self::EmailTaken(_) => write!(f, "email already registered"),
            Self::TagConflict(name) => write!(f, "tag conflict: `{name}`"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::Credential(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Credential(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NoteNotFound(id) => Self::NoteNotFound(id),
            RepoError::UserNotFound(id) => Self::UserNotFound(id),
            RepoError::UsernameTaken(username) => Self::UsernameTaken(username),
            RepoError::EmailTaken(email) => Self::EmailTaken(email),
            RepoError::TagConflict(name) => Self::TagConflict(name),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<CredentialError> for ServiceError {
    fn from(value: CredentialError) -> Self {
        Self::Credential(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, ServiceError};
    use crate::repo::RepoError;

    #[test]
    fn repo_errors_collapse_into_taxonomy() {
        let not_found = ServiceError::from(RepoError::NoteNotFound(7));
        assert_eq!(not_found.kind(), ErrorKind::NotFound);
        assert_eq!(not_found.kind().status_code(), 404);

        let conflict = ServiceError::from(RepoError::EmailTaken("a@b.io".to_string()));
        assert_eq!(conflict.kind(), ErrorKind::Conflict);
        assert_eq!(conflict.public_message(), "Email already registered");

        let internal = ServiceError::from(RepoError::InvalidData("bad row".to_string()));
        assert_eq!(internal.kind(), ErrorKind::Internal);
        assert!(!internal.public_message().contains("bad row"));
    }
}
