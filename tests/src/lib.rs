//! Vouch Test Helpers
//!
//! Responsibilities:
//! - Expectations over [`Errors`](vouch_core::Errors) that report what differed
//! - Match / no-match helpers for any constraint
//! - Test logging set up from `RUST_LOG`

mod error;
mod expectation;
mod logging;

pub use error::{MatchFailure, MatchResult};
pub use expectation::{expect, expect_match, expect_no_match, ErrorsExpectation};
pub use logging::init_tracing;

/// Everything an integration test usually needs.
pub mod prelude {
    pub use crate::{expect, expect_match, expect_no_match, init_tracing, MatchFailure, MatchResult};
    pub use vouch_constraint::*;
    pub use vouch_contract::*;
    pub use vouch_core::{map, path, tokens, Callable, ErrorRecord, Errors, Map, Object, Path, Value};
    pub use vouch_entity::{AttrDef, Entity, EntityDef};
    pub use vouch_messages::DefaultMessages;
}
