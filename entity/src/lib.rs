//! Vouch Entity
//!
//! Declarative definitions for record-like objects.
//! An entity is built once from typed attribute definitions and is immutable
//! afterwards; validation evaluates the assembled contract.

mod builder;
mod entity;
mod types;

pub use builder::{EntityDef, EntityError, EntityResult};
pub use entity::Entity;
pub use types::{AttrDef, EntitySchema};
