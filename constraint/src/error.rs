//! Constraint construction error types.

use thiserror::Error;

/// Result type for constraint construction.
pub type ConstraintResult<T> = Result<T, ConstraintError>;

/// Errors raised while building a constraint. These are programmer errors:
/// evaluation itself never fails.
#[derive(Debug, Error)]
pub enum ConstraintError {
    #[error("Unknown type: {name}")]
    UnknownType { name: String },

    #[error("Invalid class name: {name:?}")]
    InvalidClassName { name: String },

    #[error("Invalid format pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("{constraint} requires at least one {item}")]
    Empty {
        constraint: &'static str,
        item: &'static str,
    },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl ConstraintError {
    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType { name: name.into() }
    }

    pub fn invalid_class_name(name: impl Into<String>) -> Self {
        Self::InvalidClassName { name: name.into() }
    }

    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    pub fn empty(constraint: &'static str, item: &'static str) -> Self {
        Self::Empty { constraint, item }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
