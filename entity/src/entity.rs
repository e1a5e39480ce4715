//! Built entity definitions.

use vouch_constraint::Constraint;
use vouch_contract::Contract;
use vouch_core::{Errors, Value};

use crate::AttrDef;

/// An immutable entity definition with its assembled contract.
#[derive(Debug, Clone)]
pub struct Entity {
    class: String,
    attributes: Vec<AttrDef>,
    contract: Contract,
}

impl Entity {
    pub(crate) fn new(class: String, attributes: Vec<AttrDef>, contract: Contract) -> Self {
        Self {
            class,
            attributes,
            contract,
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    /// Attributes including inherited ones, parents first.
    pub fn attributes(&self) -> &[AttrDef] {
        &self.attributes
    }

    pub fn get_attr(&self, name: &str) -> Option<&AttrDef> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.get_attr(name).is_some()
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Validate a record against every attribute and attached constraint.
    pub fn validate(&self, record: &Value) -> (bool, Errors) {
        self.contract.evaluate(record)
    }

    pub fn is_valid(&self, record: &Value) -> bool {
        self.contract.matches(record)
    }
}
