//! Vouch Contract
//!
//! Composite constraints over structured values.
//!
//! Responsibilities:
//! - Register constraints against the whole value, a property path, a key or an index
//! - Include other contracts live, rejecting circular inclusion
//! - Evaluate sanity definitions first and stop a contract's own checks when one fails
//! - Scope every error to the path of the value it concerns
//! - Provide sequence, map and call-signature contracts

mod contract;
mod definition;
mod error;
mod map;
mod mapping;
mod sequence;
mod signature;

pub use contract::{Contract, ContractId, WeakContract};
pub use definition::{Definition, DefinitionOptions};
pub use error::{ContractError, ContractResult};
pub use map::{MapContract, MapOptions};
pub use mapping::{Mapping, PropertyPath};
pub use sequence::{SequenceContract, SequenceOptions};
pub use signature::{Arguments, SignatureContract, ARGUMENTS_KEY, BLOCK_KEY, KEYWORDS_KEY};
