//! Composite constraints over structured values.
//!
//! A [`Contract`] owns an ordered list of [`Definition`]s and an ordered list
//! of included contracts. Evaluation walks included contracts depth-first,
//! then the contract's own definitions, mapping the value and scoping errors
//! per definition. Sanity definitions run first; when one fails, the rest of
//! that contract's own definitions are skipped. Included contracts are
//! evaluated independently of one another.
//!
//! The negation of a contract holds when one of its sanity definitions does
//! not match, or otherwise when none of its definitions match.
//!
//! Contracts are cheap-to-clone handles. Registration takes `&self` so a
//! contract can be extended after it has been included elsewhere; the change
//! is visible on the includer's next evaluation. No lock is held while a
//! constraint runs, so recursive contracts may re-enter themselves.

use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use tracing::{debug, trace};
use vouch_constraint::{Constraint, Options};
use vouch_core::{ScopedErrors, Value};

use crate::definition::{Definition, DefinitionOptions};
use crate::error::{ContractError, ContractResult};
use crate::mapping::{Mapping, PropertyPath};

static NEXT_CONTRACT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique contract identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContractId(u64);

impl ContractId {
    fn next() -> Self {
        Self(NEXT_CONTRACT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct ContractInner {
    id: ContractId,
    options: Options,
    definitions: RwLock<Vec<Definition>>,
    included: RwLock<Vec<Contract>>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// A constraint built from registered constraints and included contracts.
#[derive(Clone)]
pub struct Contract {
    inner: Arc<ContractInner>,
}

/// A non-owning contract handle, for constraints that refer back to the
/// contract they are registered in.
#[derive(Clone)]
pub struct WeakContract {
    inner: Weak<ContractInner>,
}

impl WeakContract {
    pub fn upgrade(&self) -> Option<Contract> {
        self.inner.upgrade().map(|inner| Contract { inner })
    }
}

impl fmt::Debug for WeakContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(contract) => write!(f, "WeakContract({})", contract.id()),
            None => f.write_str("WeakContract(<dropped>)"),
        }
    }
}

impl Contract {
    pub fn new() -> Self {
        Self::with_options(Options::new())
    }

    pub fn with_options(options: Options) -> Self {
        Self {
            inner: Arc::new(ContractInner {
                id: ContractId::next(),
                options,
                definitions: RwLock::new(Vec::new()),
                included: RwLock::new(Vec::new()),
            }),
        }
    }

    pub fn id(&self) -> ContractId {
        self.inner.id
    }

    pub fn downgrade(&self) -> WeakContract {
        WeakContract {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// This contract as a registrable constraint.
    pub fn shared(&self) -> Arc<dyn Constraint> {
        Arc::new(self.clone())
    }

    /// Register a constraint against the whole value.
    pub fn add_constraint(&self, constraint: Arc<dyn Constraint>) -> &Self {
        self.add_definition(constraint, DefinitionOptions::new())
    }

    /// Register a constraint that must hold before any other of this
    /// contract's definitions is evaluated.
    pub fn add_sanity_constraint(&self, constraint: Arc<dyn Constraint>) -> &Self {
        self.add_definition(constraint, DefinitionOptions::new().sanity())
    }

    /// Register a constraint against the value reached by reading `names` in order.
    pub fn add_property_constraint<I, S>(
        &self,
        names: I,
        constraint: Arc<dyn Constraint>,
    ) -> ContractResult<&Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path = PropertyPath::new(names)?;
        let options = DefinitionOptions::new().mapped(Mapping::Property(path));
        Ok(self.add_definition(constraint, options))
    }

    /// Register a constraint with explicit mapping options. Sanity
    /// definitions are placed after existing sanity definitions and ahead of
    /// every other definition.
    pub fn add_definition(
        &self,
        constraint: Arc<dyn Constraint>,
        options: DefinitionOptions,
    ) -> &Self {
        let definition = Definition {
            constraint,
            contract: self.id(),
            options,
        };
        let mut definitions = write(&self.inner.definitions);
        let position = if definition.is_sanity() {
            definitions.iter().take_while(|d| d.is_sanity()).count()
        } else {
            definitions.len()
        };
        definitions.insert(position, definition);
        self
    }

    /// Include `other`: its definitions, present and future, apply to this contract.
    pub fn include(&self, other: &Contract) -> ContractResult<&Self> {
        if other.id() == self.id() || other.includes(self) {
            return Err(ContractError::circular_inclusion(
                self.id().raw(),
                other.id().raw(),
            ));
        }
        write(&self.inner.included).push(other.clone());
        Ok(self)
    }

    /// Whether `other` is reachable through this contract's inclusions.
    pub fn includes(&self, other: &Contract) -> bool {
        self.included()
            .iter()
            .any(|included| included.id() == other.id() || included.includes(other))
    }

    /// This contract's own definitions, sanity definitions first.
    pub fn definitions(&self) -> Vec<Definition> {
        read(&self.inner.definitions).clone()
    }

    pub fn included(&self) -> Vec<Contract> {
        read(&self.inner.included).clone()
    }

    /// Every definition that applies: included contracts depth-first, in
    /// inclusion order, then this contract's own. Recomputed on every call.
    pub fn each_definition(&self) -> Vec<Definition> {
        let mut definitions = Vec::new();
        self.collect_definitions(&mut definitions);
        definitions
    }

    fn collect_definitions(&self, definitions: &mut Vec<Definition>) {
        for included in self.included() {
            included.collect_definitions(definitions);
        }
        definitions.extend(self.definitions());
    }

    /// Each applicable definition with the sub-value it checks. Definitions
    /// with a default and an absent value are left out.
    pub fn each_pair<'v>(&self, value: &'v Value) -> Vec<(Definition, Cow<'v, Value>)> {
        self.each_definition()
            .into_iter()
            .filter_map(|definition| {
                let mapped = definition.map_value(value)?;
                Some((definition, mapped))
            })
            .collect()
    }

    fn matches_own(&self, actual: &Value) -> bool {
        self.definitions().iter().all(|definition| {
            let Some(mapped) = definition.map_value(actual) else {
                return true;
            };
            let matched = definition.constraint.matches(&mapped);
            if !matched && definition.is_sanity() {
                debug!(contract = %self.id(), "sanity check failed");
            }
            matched
        })
    }

    fn own_pairs<'v>(&self, actual: &'v Value) -> Vec<(Definition, Cow<'v, Value>)> {
        self.definitions()
            .into_iter()
            .filter_map(|definition| {
                let mapped = definition.map_value(actual)?;
                Some((definition, mapped))
            })
            .collect()
    }

    /// True when a sanity definition applies and its constraint does not
    /// match, in which case the whole group is negated.
    fn sanity_negated(&self, pairs: &[(Definition, Cow<'_, Value>)]) -> bool {
        let negated = pairs.iter().any(|(definition, mapped)| {
            definition.is_sanity() && definition.constraint.does_not_match(mapped)
        });
        if negated {
            debug!(contract = %self.id(), "sanity check does not match; negation holds");
        }
        negated
    }

    fn does_not_match_own(&self, actual: &Value) -> bool {
        let pairs = self.own_pairs(actual);
        if self.sanity_negated(&pairs) {
            return true;
        }
        pairs
            .iter()
            .all(|(definition, mapped)| definition.constraint.does_not_match(mapped))
    }

    fn check_own(&self, actual: &Value, errors: &mut ScopedErrors<'_>) -> bool {
        let mut status = true;
        for definition in self.definitions() {
            let Some(mapped) = definition.map_value(actual) else {
                continue;
            };
            trace!(
                contract = %self.id(),
                constraint = definition.constraint.type_token(),
                path = %definition.options.mapping.path(),
                "checking definition"
            );
            let mut scoped = definition.options.mapping.map_errors(errors);
            if definition.constraint.check(&mapped, &mut scoped) {
                continue;
            }
            status = false;
            if definition.is_sanity() {
                debug!(contract = %self.id(), "sanity check failed; skipping remaining definitions");
                break;
            }
        }
        status
    }

    fn check_negated_own(&self, actual: &Value, errors: &mut ScopedErrors<'_>) -> bool {
        let pairs = self.own_pairs(actual);
        if self.sanity_negated(&pairs) {
            return true;
        }
        let mut status = true;
        for (definition, mapped) in &pairs {
            let mut scoped = definition.options.mapping.map_errors(errors);
            status &= definition.constraint.check_negated(mapped, &mut scoped);
        }
        status
    }
}

impl Default for Contract {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let included: Vec<ContractId> = self.included().iter().map(Contract::id).collect();
        f.debug_struct("Contract")
            .field("id", &self.id())
            .field("definitions", &read(&self.inner.definitions).len())
            .field("included", &included)
            .finish()
    }
}

impl Constraint for Contract {
    fn options(&self) -> Options {
        self.inner.options.clone()
    }

    fn matches(&self, actual: &Value) -> bool {
        self.included().iter().all(|included| included.matches(actual)) && self.matches_own(actual)
    }

    fn does_not_match(&self, actual: &Value) -> bool {
        self.included()
            .iter()
            .all(|included| included.does_not_match(actual))
            && self.does_not_match_own(actual)
    }

    fn update_errors(&self, actual: &Value, errors: &mut ScopedErrors<'_>) {
        self.check(actual, errors);
    }

    fn update_negated_errors(&self, actual: &Value, errors: &mut ScopedErrors<'_>) {
        self.check_negated(actual, errors);
    }

    fn check(&self, actual: &Value, errors: &mut ScopedErrors<'_>) -> bool {
        let mut status = true;
        for included in self.included() {
            status &= included.check(actual, errors);
        }
        status & self.check_own(actual, errors)
    }

    fn check_negated(&self, actual: &Value, errors: &mut ScopedErrors<'_>) -> bool {
        let mut status = true;
        for included in self.included() {
            status &= included.check_negated(actual, errors);
        }
        status & self.check_negated_own(actual, errors)
    }
}

/// Implements [`Constraint`] for wrappers holding a `contract: Contract` field.
macro_rules! forward_constraint {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl vouch_constraint::Constraint for $ty {
                fn type_token(&self) -> &'static str {
                    self.contract.type_token()
                }

                fn negated_type_token(&self) -> &'static str {
                    self.contract.negated_type_token()
                }

                fn options(&self) -> vouch_constraint::Options {
                    self.contract.options()
                }

                fn matches(&self, actual: &vouch_core::Value) -> bool {
                    self.contract.matches(actual)
                }

                fn does_not_match(&self, actual: &vouch_core::Value) -> bool {
                    self.contract.does_not_match(actual)
                }

                fn update_errors(
                    &self,
                    actual: &vouch_core::Value,
                    errors: &mut vouch_core::ScopedErrors<'_>,
                ) {
                    self.contract.update_errors(actual, errors)
                }

                fn update_negated_errors(
                    &self,
                    actual: &vouch_core::Value,
                    errors: &mut vouch_core::ScopedErrors<'_>,
                ) {
                    self.contract.update_negated_errors(actual, errors)
                }

                fn check(
                    &self,
                    actual: &vouch_core::Value,
                    errors: &mut vouch_core::ScopedErrors<'_>,
                ) -> bool {
                    self.contract.check(actual, errors)
                }

                fn check_negated(
                    &self,
                    actual: &vouch_core::Value,
                    errors: &mut vouch_core::ScopedErrors<'_>,
                ) -> bool {
                    self.contract.check_negated(actual, errors)
                }
            }
        )+
    };
}

pub(crate) use forward_constraint;
