//! Contract registration error types.

use thiserror::Error;
use vouch_constraint::ConstraintError;

/// Result type for contract registration.
pub type ContractResult<T> = Result<T, ContractError>;

/// Errors raised while assembling a contract. Evaluation never fails.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("Contract {contract} can't include {included}: inclusion would be circular")]
    CircularInclusion { contract: u64, included: u64 },

    #[error("Property path can't be empty")]
    EmptyPropertyPath,

    #[error("Duplicate key: {key}")]
    DuplicateKey { key: String },

    #[error("Duplicate parameter: {name}")]
    DuplicateParameter { name: String },

    #[error("Variadic constraint already set")]
    DuplicateVariadic,

    #[error("Block constraint already set")]
    DuplicateBlock,

    #[error("Required item {index} can't follow an optional item")]
    RequiredAfterOptional { index: usize },

    #[error(transparent)]
    Constraint(#[from] ConstraintError),
}

impl ContractError {
    pub fn circular_inclusion(contract: u64, included: u64) -> Self {
        Self::CircularInclusion { contract, included }
    }

    pub fn duplicate_key(key: impl Into<String>) -> Self {
        Self::DuplicateKey { key: key.into() }
    }

    pub fn duplicate_parameter(name: impl Into<String>) -> Self {
        Self::DuplicateParameter { name: name.into() }
    }

    pub fn required_after_optional(index: usize) -> Self {
        Self::RequiredAfterOptional { index }
    }
}
