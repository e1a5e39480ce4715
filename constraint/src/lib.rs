//! Vouch Constraint
//!
//! Predicates over values that explain their failures.
//!
//! Responsibilities:
//! - Decide whether a value matches, and whether it definitely does not
//! - Report path-scoped violation records for either sense
//! - Carry immutable options, including message overrides
//! - Forward through rebindable delegators for late-bound contracts

mod basic;
mod constraint;
mod delegator;
mod enumeration;
mod equality;
mod error;
mod format;
mod maps;
mod sequences;
mod signature;
mod type_check;
mod types;
mod union;

pub use basic::{Absence, Anything, Nothing, Presence};
pub use constraint::{data, Constraint, Options};
pub use delegator::Delegator;
pub use enumeration::Enum;
pub use equality::{Equality, Identity};
pub use error::{ConstraintError, ConstraintResult};
pub use format::{Format, FormatPattern};
pub use maps::{ExtraKeys, KeySource, VariadicKeys};
pub use sequences::{ExtraItems, ItemCount, MissingItems, VariadicItems};
pub use signature::Signature;
pub use type_check::Type;
pub use types::TypeSpec;
pub use union::Union;
