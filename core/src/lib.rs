//! Vouch Core Types
//!
//! This crate provides the foundational types used throughout Vouch:
//! - Value types (the Value enum with scalars, collections, objects and callables)
//! - Paths locating nested values
//! - The Errors accumulator and its scoped views
//! - Error type tokens shared by constraints and message catalogs

mod errors;
mod path;
pub mod tokens;
mod value;

pub use errors::*;
pub use path::*;
pub use value::*;
