//! Domain model for users, corkboard notes and tags.
//!
//! # Responsibility
//! - Define the records exchanged between repositories and services.
//! - Own input validation that must pass before anything reaches SQL.
//!
//! # Invariants
//! - Identifiers are storage-assigned and never reused.
//! - Note geometry is always finite; sizes are strictly positive.
//! - Tag names are trimmed and compared case-sensitively.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod note;
pub mod tag;
pub mod user;

/// Input rejected before reaching the persistence layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Position or size component is NaN or infinite.
    NonFiniteGeometry { field: &'static str },
    /// Width or height is zero or negative.
    NonPositiveSize { field: &'static str, value: f64 },
    /// Tag name is empty after trimming.
    EmptyTagName,
    /// Tag name exceeds the maximum length.
    TagNameTooLong { name: String, max_chars: usize },
    /// Username does not match the accepted character set/length.
    InvalidUsername(String),
    /// Email is not shaped like `local@domain.tld`.
    InvalidEmail(String),
    /// Password is shorter than the minimum length.
    PasswordTooShort { min_chars: usize },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFiniteGeometry { field } => write!(f, "`{field}` must be a finite number"),
            Self::NonPositiveSize { field, value } => {
                write!(f, "`{field}` must be greater than zero, got {value}")
            }
            Self::EmptyTagName => write!(f, "tag name must not be empty"),
            Self::TagNameTooLong { name, max_chars } => {
                write!(f, "tag name `{name}` exceeds {max_chars} characters")
            }
            Self::InvalidUsername(value) => write!(f, "invalid username: `{value}`"),
            Self::InvalidEmail(value) => write!(f, "invalid email: `{value}`"),
            Self::PasswordTooShort { min_chars } => {
                write!(f, "password must be at least {min_chars} characters")
            }
        }
    }
}

impl Error for ValidationError {}
