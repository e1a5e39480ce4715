//! Expectation failures.

use thiserror::Error;
use vouch_core::{Errors, Path, Value};

/// Result type for expectations.
pub type MatchResult<T> = Result<T, MatchFailure>;

/// Why an expectation did not hold.
#[derive(Debug, Error)]
pub enum MatchFailure {
    #[error("expected {value} to match, got:\n{errors}")]
    UnexpectedMismatch { value: Value, errors: Errors },

    #[error("expected {value} not to match, got:\n{errors}")]
    UnexpectedMatch { value: Value, errors: Errors },

    #[error("expected {expected} errors, got {actual}:\n{errors}")]
    Count {
        expected: usize,
        actual: usize,
        errors: Errors,
    },

    #[error("expected errors:\n{expected}\ngot:\n{actual}")]
    RecordsDiffer { expected: Errors, actual: Errors },

    #[error("expected {kind} at {path}, got:\n{errors}")]
    MissingRecord {
        path: Path,
        kind: String,
        errors: Errors,
    },

    #[error("invalid message pattern: {0}")]
    InvalidPattern(#[from] regex_lite::Error),

    #[error("no message matches '{pattern}':\n{errors}")]
    NoMessageMatching { pattern: String, errors: Errors },
}

impl MatchFailure {
    pub fn count(expected: usize, errors: &Errors) -> Self {
        Self::Count {
            expected,
            actual: errors.len(),
            errors: errors.clone(),
        }
    }

    pub fn missing_record(path: &Path, kind: &str, errors: &Errors) -> Self {
        Self::MissingRecord {
            path: path.clone(),
            kind: kind.to_string(),
            errors: errors.clone(),
        }
    }
}
