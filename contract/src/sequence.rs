//! Tuple-shaped contracts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Deserialize;
use vouch_constraint::{
    Anything, Constraint, Delegator, ExtraItems, ItemCount, MissingItems, Options, Type,
    TypeSpec, VariadicItems,
};

use crate::contract::{forward_constraint, Contract, WeakContract};
use crate::definition::DefinitionOptions;
use crate::error::{ContractError, ContractResult};
use crate::mapping::Mapping;

/// Sequence contract configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SequenceOptions {
    /// Accept items beyond the registered positions.
    pub allow_extra_items: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct Positions {
    required: usize,
    total: usize,
}

fn positions(contract: &Contract) -> Positions {
    contract
        .definitions()
        .iter()
        .fold(Positions::default(), |mut positions, definition| {
            if let Mapping::Index(index) = definition.options.mapping {
                positions.total = positions.total.max(index + 1);
                if !definition.options.default {
                    positions.required = positions.required.max(index + 1);
                }
            }
            positions
        })
}

fn live_count(contract: WeakContract, pick: fn(Positions) -> usize) -> ItemCount {
    ItemCount::dynamic(move || contract.upgrade().map_or(0, |c| pick(positions(&c))))
}

/// A contract over sequences with one constraint per position.
///
/// The value must be an array with every required position present; unless
/// extra items are allowed or a variadic constraint is set, it must not have
/// items beyond the registered positions. These structural checks run before
/// any per-position check.
#[derive(Debug, Clone)]
pub struct SequenceContract {
    contract: Contract,
    extra_items: Arc<Delegator>,
    variadic: Arc<AtomicBool>,
}

impl SequenceContract {
    pub fn new() -> Self {
        Self::with_options(SequenceOptions::default())
    }

    pub fn with_options(options: SequenceOptions) -> Self {
        let contract = Contract::with_options(
            Options::new().with("allow_extra_items", options.allow_extra_items),
        );
        let required = live_count(contract.downgrade(), |p| p.required);
        let total = live_count(contract.downgrade(), |p| p.total);

        let extra_items: Arc<dyn Constraint> = if options.allow_extra_items {
            Anything::new().into_shared()
        } else {
            ExtraItems::new(total).into_shared()
        };
        let extra_items = Arc::new(Delegator::new(extra_items));

        contract
            .add_sanity_constraint(Type::new(TypeSpec::Array).into_shared())
            .add_sanity_constraint(MissingItems::new(required).into_shared())
            .add_sanity_constraint(extra_items.clone());

        Self {
            contract,
            extra_items,
            variadic: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Register a constraint for the next position. The item must be present.
    pub fn add_item(&self, constraint: Arc<dyn Constraint>) -> ContractResult<&Self> {
        let positions = positions(&self.contract);
        if positions.required < positions.total {
            return Err(ContractError::required_after_optional(positions.total));
        }
        self.contract.add_definition(
            constraint,
            DefinitionOptions::new().mapped(Mapping::Index(positions.total)),
        );
        Ok(self)
    }

    /// Register a constraint for the next position, which may be absent.
    pub fn add_optional_item(&self, constraint: Arc<dyn Constraint>) -> &Self {
        let index = positions(&self.contract).total;
        self.contract.add_definition(
            constraint,
            DefinitionOptions::new()
                .mapped(Mapping::Index(index))
                .with_default(),
        );
        self
    }

    /// Apply `constraint` to every item after the registered positions.
    pub fn set_variadic(&self, constraint: Arc<dyn Constraint>) -> ContractResult<&Self> {
        if self.variadic.swap(true, Ordering::SeqCst) {
            return Err(ContractError::DuplicateVariadic);
        }
        self.extra_items.set_receiver(Anything::new().into_shared());
        let start = live_count(self.contract.downgrade(), |p| p.total);
        self.contract
            .add_constraint(VariadicItems::new(start, constraint).into_shared());
        Ok(self)
    }

    pub fn item_count(&self) -> usize {
        positions(&self.contract).total
    }

    pub fn required_count(&self) -> usize {
        positions(&self.contract).required
    }

    pub fn has_variadic(&self) -> bool {
        self.variadic.load(Ordering::SeqCst)
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn shared(&self) -> Arc<dyn Constraint> {
        Arc::new(self.clone())
    }
}

impl Default for SequenceContract {
    fn default() -> Self {
        Self::new()
    }
}

forward_constraint!(SequenceContract);
