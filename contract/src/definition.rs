//! Registered constraints and their mapping options.

use std::borrow::Cow;
use std::sync::Arc;

use vouch_constraint::Constraint;
use vouch_core::Value;

use crate::contract::ContractId;
use crate::mapping::Mapping;

/// How a registered constraint is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefinitionOptions {
    pub mapping: Mapping,
    /// Evaluated ahead of the contract's other definitions; a failure stops
    /// the rest of that contract.
    pub sanity: bool,
    /// The mapped value may be absent; absent values are not checked.
    pub default: bool,
}

impl DefinitionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mapped(mut self, mapping: Mapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn sanity(mut self) -> Self {
        self.sanity = true;
        self
    }

    pub fn with_default(mut self) -> Self {
        self.default = true;
        self
    }
}

/// A constraint bound to the contract that registered it.
#[derive(Debug, Clone)]
pub struct Definition {
    pub constraint: Arc<dyn Constraint>,
    pub contract: ContractId,
    pub options: DefinitionOptions,
}

impl Definition {
    pub fn is_sanity(&self) -> bool {
        self.options.sanity
    }

    /// The sub-value this definition checks. Absent values read as nil,
    /// unless the definition has a default, in which case it is skipped.
    pub fn map_value<'v>(&self, value: &'v Value) -> Option<Cow<'v, Value>> {
        match self.options.mapping.map_value(value) {
            Some(mapped) => Some(mapped),
            None if self.options.default => None,
            None => Some(Cow::Owned(Value::Null)),
        }
    }
}
