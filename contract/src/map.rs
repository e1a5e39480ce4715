//! Record-shaped contracts over maps.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Deserialize;
use vouch_constraint::{
    Anything, Constraint, Delegator, ExtraKeys, KeySource, Options, Signature, Type, TypeSpec,
    VariadicKeys,
};
use vouch_core::{StrictKey, Value};

use crate::contract::{forward_constraint, Contract, WeakContract};
use crate::definition::DefinitionOptions;
use crate::error::{ContractError, ContractResult};
use crate::mapping::Mapping;

/// Map contract configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    /// Accept keys that have no registered constraint.
    pub allow_extra_keys: bool,
    /// Accept any value answering to `[]`, `each` and `keys`, not only maps.
    pub allow_hash_like: bool,
    /// Treat string and symbol keys of the same name as the same key.
    pub indifferent: bool,
}

/// Keys registered through key definitions, included contracts first.
fn registered_keys(contract: &Contract) -> Vec<Value> {
    contract
        .each_definition()
        .into_iter()
        .filter_map(|definition| match definition.options.mapping {
            Mapping::Key { key, .. } => Some(key),
            _ => None,
        })
        .collect()
}

fn live_keys(contract: WeakContract) -> KeySource {
    KeySource::dynamic(move || {
        contract
            .upgrade()
            .map(|c| registered_keys(&c))
            .unwrap_or_default()
    })
}

/// A contract over maps with one constraint per key.
///
/// The value must be a map (or map-like, when allowed). Unless extra keys are
/// allowed or a variadic constraint is set, keys without a registered
/// constraint are reported individually.
#[derive(Debug, Clone)]
pub struct MapContract {
    contract: Contract,
    options: MapOptions,
    extra_keys: Arc<Delegator>,
    variadic: Arc<AtomicBool>,
}

impl MapContract {
    pub fn new() -> Self {
        Self::with_options(MapOptions::default())
    }

    /// A contract treating string and symbol keys as interchangeable.
    pub fn indifferent() -> Self {
        Self::with_options(MapOptions {
            indifferent: true,
            ..MapOptions::default()
        })
    }

    pub fn with_options(options: MapOptions) -> Self {
        let contract = Contract::with_options(
            Options::new()
                .with("allow_extra_keys", options.allow_extra_keys)
                .with("allow_hash_like", options.allow_hash_like)
                .with("indifferent", options.indifferent),
        );

        let structure: Arc<dyn Constraint> = if options.allow_hash_like {
            Signature::map_like().into_shared()
        } else {
            Type::new(TypeSpec::Hash).into_shared()
        };
        let extra_keys: Arc<dyn Constraint> = if options.allow_extra_keys {
            Anything::new().into_shared()
        } else {
            let constraint = ExtraKeys::from_source(live_keys(contract.downgrade()));
            if options.indifferent {
                constraint.indifferent().into_shared()
            } else {
                constraint.into_shared()
            }
        };
        let extra_keys = Arc::new(Delegator::new(extra_keys));

        contract
            .add_sanity_constraint(structure)
            .add_constraint(extra_keys.clone());

        Self {
            contract,
            options,
            extra_keys,
            variadic: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn map_options(&self) -> MapOptions {
        self.options
    }

    fn mapping(&self, key: Value) -> ContractResult<Mapping> {
        let normalized = |key: &Value| match key.key_name() {
            Some(name) if self.options.indifferent => StrictKey(Value::symbol(name)),
            _ => StrictKey(key.clone()),
        };
        let candidate = normalized(&key);
        if self.keys().iter().any(|existing| normalized(existing) == candidate) {
            return Err(ContractError::duplicate_key(key.to_string()));
        }
        Ok(Mapping::Key {
            key,
            indifferent: self.options.indifferent,
        })
    }

    /// Register a constraint for a key that must be present.
    ///
    /// A missing key reads as nil, so the constraint decides whether nil is acceptable.
    pub fn add_key(
        &self,
        key: impl Into<Value>,
        constraint: Arc<dyn Constraint>,
    ) -> ContractResult<&Self> {
        let mapping = self.mapping(key.into())?;
        self.contract
            .add_definition(constraint, DefinitionOptions::new().mapped(mapping));
        Ok(self)
    }

    /// Register a constraint for a key that may be absent.
    pub fn add_optional_key(
        &self,
        key: impl Into<Value>,
        constraint: Arc<dyn Constraint>,
    ) -> ContractResult<&Self> {
        let mapping = self.mapping(key.into())?;
        self.contract.add_definition(
            constraint,
            DefinitionOptions::new().mapped(mapping).with_default(),
        );
        Ok(self)
    }

    /// Apply `constraint` to the value of every key without a registered constraint.
    pub fn set_variadic(&self, constraint: Arc<dyn Constraint>) -> ContractResult<&Self> {
        if self.variadic.swap(true, Ordering::SeqCst) {
            return Err(ContractError::DuplicateVariadic);
        }
        self.extra_keys.set_receiver(Anything::new().into_shared());
        let variadic = VariadicKeys::new(live_keys(self.contract.downgrade()), constraint);
        let variadic = if self.options.indifferent {
            variadic.indifferent()
        } else {
            variadic
        };
        self.contract.add_constraint(variadic.into_shared());
        Ok(self)
    }

    /// Registered keys, in registration order.
    pub fn keys(&self) -> Vec<Value> {
        registered_keys(&self.contract)
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

impl Default for MapContract {
    fn default() -> Self {
        Self::new()
    }
}

forward_constraint!(MapContract);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vouch_core::{map, path, tokens, Map, Object};

    fn integer() -> Arc<dyn Constraint> {
        Type::named("Integer").unwrap().into_shared()
    }

    fn point() -> MapContract {
        let contract = MapContract::new();
        contract.add_key("a", integer()).unwrap();
        contract.add_key("b", integer()).unwrap();
        contract
    }

    #[test]
    fn test_registered_keys_match() {
        assert!(point().matches(&Value::from(map! { "a" => 1, "b" => 2 })));
    }

    #[test]
    fn test_extra_key_reported_at_key() {
        // WHEN
        let (status, errors) =
            point().evaluate(&Value::from(map! { "a" => 1, "b" => 2, "c" => 3 }));

        // THEN
        assert!(!status);
        let records = errors.to_flat_vec();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, tokens::EXTRA_KEYS);
        assert_eq!(records[0].path, path!["c"]);
    }

    #[test]
    fn test_non_map_yields_one_structural_error() {
        for value in [Value::Int(1), Value::Null, Value::list([1, 2])] {
            let (status, errors) = point().evaluate(&value);

            assert!(!status);
            assert_eq!(errors.len(), 1);
            let record = errors.iter().next().unwrap();
            assert_eq!(record.kind, tokens::IS_NOT_TYPE);
            assert_eq!(record.data["type"], Value::from("Hash"));
        }
    }

    #[test]
    fn test_missing_key_reads_as_nil() {
        let (status, errors) = point().evaluate(&Value::from(map! { "a" => 1 }));

        assert!(!status);
        assert_eq!(errors.iter().next().unwrap().path, path!["b"]);
    }

    #[test]
    fn test_optional_key() {
        let contract = MapContract::new();
        contract.add_optional_key("note", integer()).unwrap();

        assert!(contract.matches(&Value::from(map! {})));
        assert!(!contract.matches(&Value::from(map! { "note" => "x" })));
    }

    #[test]
    fn test_duplicate_key_fails() {
        let contract = point();

        assert!(matches!(
            contract.add_key("a", integer()),
            Err(ContractError::DuplicateKey { .. })
        ));
        assert!(contract.add_key(Value::symbol("a"), integer()).is_ok());
    }

    #[test]
    fn test_indifferent_keys() {
        // GIVEN
        let contract = MapContract::indifferent();
        contract.add_key("name", Type::named("String").unwrap().into_shared()).unwrap();
        let value = Value::from(Map::new().with(Value::symbol("name"), "gear"));

        // THEN - lookup and extra-key checks both ignore the key's kind
        assert!(contract.matches(&value));
        assert!(matches!(
            contract.add_key(Value::symbol("name"), integer()),
            Err(ContractError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn test_allow_extra_keys() {
        let contract = MapContract::with_options(MapOptions {
            allow_extra_keys: true,
            ..MapOptions::default()
        });
        contract.add_key("a", integer()).unwrap();

        assert!(contract.matches(&Value::from(map! { "a" => 1, "z" => "zz" })));
    }

    #[test]
    fn test_hash_like_objects() {
        // GIVEN
        let contract = MapContract::with_options(MapOptions {
            allow_hash_like: true,
            ..MapOptions::default()
        });
        contract.add_key("width", integer()).unwrap();
        let settings = Object::new("Settings")
            .with_method("[]")
            .with_method("each")
            .with_method("keys")
            .with_field("width", 3);

        // THEN
        assert!(contract.matches(&Value::from(settings)));
        assert!(!point().matches(&Value::from(Object::new("Settings"))));
        let errors = contract.errors_for(&Value::Int(1));
        assert_eq!(errors.iter().next().unwrap().kind, tokens::DOES_NOT_HAVE_METHODS);
    }

    #[test]
    fn test_variadic_values() {
        // GIVEN
        let contract = MapContract::new();
        contract.add_key("name", Type::named("String").unwrap().into_shared()).unwrap();
        contract.set_variadic(integer()).unwrap();

        // WHEN
        let (status, errors) = contract.evaluate(&Value::from(map! {
            "name" => "gear",
            "teeth" => 12,
            "pitch" => "fine",
        }));

        // THEN
        assert!(!status);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.iter().next().unwrap().path, path!["pitch"]);
        assert!(matches!(
            contract.set_variadic(integer()),
            Err(ContractError::DuplicateVariadic)
        ));
    }

    #[test]
    fn test_keys_registered_later_are_expected() {
        // GIVEN
        let contract = point();
        let value = Value::from(map! { "a" => 1, "b" => 2, "c" => 3 });
        assert!(!contract.matches(&value));

        // WHEN
        contract.add_key("c", integer()).unwrap();

        // THEN
        assert!(contract.matches(&value));
        assert_eq!(contract.keys(), vec![Value::from("a"), Value::from("b"), Value::from("c")]);
    }

    #[test]
    fn test_options_from_json() {
        let options: MapOptions =
            serde_json::from_str(r#"{"indifferent": true, "allow_extra_keys": true}"#).unwrap();

        assert!(options.indifferent);
        assert!(options.allow_extra_keys);
        assert!(!options.allow_hash_like);
    }
}
