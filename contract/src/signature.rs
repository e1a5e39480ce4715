//! Call-signature contracts.
//!
//! A call is checked as a map with three entries: `:arguments` (the
//! positional values), `:keywords` (a map of keyword values) and `:block`
//! (a callable or nil). [`Arguments`] builds that shape.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use vouch_constraint::{Anything, Constraint, Delegator, Type, TypeSpec};
use vouch_core::{Callable, Map, Value};

use crate::contract::{forward_constraint, Contract};
use crate::definition::DefinitionOptions;
use crate::error::{ContractError, ContractResult};
use crate::map::{MapContract, MapOptions};
use crate::mapping::Mapping;
use crate::sequence::SequenceContract;

pub const ARGUMENTS_KEY: &str = "arguments";
pub const KEYWORDS_KEY: &str = "keywords";
pub const BLOCK_KEY: &str = "block";

/// The values passed in one call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    pub positional: Vec<Value>,
    pub keywords: Map,
    pub block: Option<Callable>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Add a keyword; the name becomes a symbol key.
    pub fn keyword(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.keywords.insert(Value::symbol(name), value);
        self
    }

    pub fn block(mut self, block: Callable) -> Self {
        self.block = Some(block);
        self
    }

    pub fn to_value(&self) -> Value {
        Value::Map(
            Map::new()
                .with(Value::symbol(ARGUMENTS_KEY), self.positional.clone())
                .with(Value::symbol(KEYWORDS_KEY), self.keywords.clone())
                .with(Value::symbol(BLOCK_KEY), self.block.clone()),
        )
    }
}

impl From<Arguments> for Value {
    fn from(arguments: Arguments) -> Self {
        arguments.to_value()
    }
}

/// A contract over calls: positional parameters, keywords and a block.
///
/// Parameter names are unique across positional and keyword parameters.
#[derive(Debug, Clone)]
pub struct SignatureContract {
    contract: Contract,
    arguments: SequenceContract,
    keywords: MapContract,
    block: Arc<Delegator>,
    block_set: Arc<AtomicBool>,
    names: Arc<Mutex<Vec<String>>>,
}

impl SignatureContract {
    pub fn new() -> Self {
        let contract = Contract::new();
        let arguments = SequenceContract::new();
        let keywords = MapContract::with_options(MapOptions {
            indifferent: true,
            ..MapOptions::default()
        });
        let block = Arc::new(Delegator::new(Anything::new().into_shared()));

        let at = |key: &str| DefinitionOptions::new().mapped(Mapping::key(Value::symbol(key)));
        contract
            .add_sanity_constraint(Type::new(TypeSpec::Hash).into_shared())
            .add_definition(arguments.shared(), at(ARGUMENTS_KEY))
            .add_definition(keywords.shared(), at(KEYWORDS_KEY))
            .add_definition(block.clone(), at(BLOCK_KEY));

        Self {
            contract,
            arguments,
            keywords,
            block,
            block_set: Arc::new(AtomicBool::new(false)),
            names: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn claim(&self, name: &str) -> ContractResult<()> {
        let mut names = self.names.lock().unwrap_or_else(PoisonError::into_inner);
        if names.iter().any(|existing| existing == name) {
            return Err(ContractError::duplicate_parameter(name));
        }
        names.push(name.to_string());
        Ok(())
    }

    fn release(&self, name: &str) {
        let mut names = self.names.lock().unwrap_or_else(PoisonError::into_inner);
        names.retain(|existing| existing != name);
    }

    /// Claim `name`, then run `register`; the name is released if it fails.
    fn claimed(
        &self,
        name: &str,
        register: impl FnOnce() -> ContractResult<()>,
    ) -> ContractResult<&Self> {
        self.claim(name)?;
        if let Err(err) = register() {
            self.release(name);
            return Err(err);
        }
        Ok(self)
    }

    /// A required positional parameter.
    pub fn add_argument(&self, name: &str, constraint: Arc<dyn Constraint>) -> ContractResult<&Self> {
        self.claimed(name, || self.arguments.add_item(constraint).map(drop))
    }

    /// A positional parameter with a default value.
    pub fn add_optional_argument(
        &self,
        name: &str,
        constraint: Arc<dyn Constraint>,
    ) -> ContractResult<&Self> {
        self.claim(name)?;
        self.arguments.add_optional_item(constraint);
        Ok(self)
    }

    /// Constraint for every positional value beyond the named parameters.
    pub fn set_arguments_item(&self, constraint: Arc<dyn Constraint>) -> ContractResult<&Self> {
        self.arguments.set_variadic(constraint)?;
        Ok(self)
    }

    /// A required keyword parameter.
    pub fn add_keyword(&self, name: &str, constraint: Arc<dyn Constraint>) -> ContractResult<&Self> {
        self.claimed(name, || self.keywords.add_key(Value::symbol(name), constraint).map(drop))
    }

    /// A keyword parameter with a default value.
    pub fn add_optional_keyword(
        &self,
        name: &str,
        constraint: Arc<dyn Constraint>,
    ) -> ContractResult<&Self> {
        self.claimed(name, || {
            self.keywords
                .add_optional_key(Value::symbol(name), constraint)
                .map(drop)
        })
    }

    /// Constraint for every keyword value beyond the named keywords.
    pub fn set_keywords_value(&self, constraint: Arc<dyn Constraint>) -> ContractResult<&Self> {
        self.keywords.set_variadic(constraint)?;
        Ok(self)
    }

    /// Require a block (`true`) or forbid one (`false`).
    pub fn set_block(&self, required: bool) -> ContractResult<&Self> {
        let spec = if required { TypeSpec::Proc } else { TypeSpec::Nil };
        self.set_block_constraint(Type::new(spec).into_shared())
    }

    pub fn set_block_constraint(&self, constraint: Arc<dyn Constraint>) -> ContractResult<&Self> {
        if self.block_set.swap(true, Ordering::SeqCst) {
            return Err(ContractError::DuplicateBlock);
        }
        self.block.set_receiver(constraint);
        Ok(self)
    }

    /// Positional and keyword parameter names, in registration order.
    pub fn parameter_names(&self) -> Vec<String> {
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn arguments(&self) -> &SequenceContract {
        &self.arguments
    }

    pub fn keywords(&self) -> &MapContract {
        &self.keywords
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn shared(&self) -> Arc<dyn Constraint> {
        Arc::new(self.clone())
    }
}

impl Default for SignatureContract {
    fn default() -> Self {
        Self::new()
    }
}

forward_constraint!(SignatureContract);
