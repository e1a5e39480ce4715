//! Key policies for maps: extra keys and variadic values.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use vouch_core::{tokens, PathSegment, ScopedErrors, StrictKey, Value};

use crate::constraint::{data, message_options, Constraint, Options};
use crate::types::add_type_error;

type KeyFn = dyn Fn() -> Vec<Value> + Send + Sync;

/// The set of expected keys, fixed or recomputed on every check.
#[derive(Clone)]
pub enum KeySource {
    Fixed(Vec<Value>),
    /// Invoked on every evaluation; must be cheap and side-effect free.
    Dynamic(Arc<KeyFn>),
}

impl KeySource {
    pub fn fixed<I, T>(keys: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        KeySource::Fixed(keys.into_iter().map(Into::into).collect())
    }

    pub fn dynamic(f: impl Fn() -> Vec<Value> + Send + Sync + 'static) -> Self {
        KeySource::Dynamic(Arc::new(f))
    }

    pub fn keys(&self) -> Vec<Value> {
        match self {
            KeySource::Fixed(keys) => keys.clone(),
            KeySource::Dynamic(f) => f(),
        }
    }
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Fixed(keys) => f.debug_tuple("Fixed").field(keys).finish(),
            KeySource::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

struct KeySet {
    keys: HashSet<StrictKey>,
    indifferent: bool,
}

impl KeySet {
    fn new(keys: Vec<Value>, indifferent: bool) -> Self {
        let keys = keys
            .into_iter()
            .map(|key| normalize(key, indifferent))
            .collect();
        Self { keys, indifferent }
    }

    fn contains(&self, key: &Value) -> bool {
        self.keys.contains(&normalize(key.clone(), self.indifferent))
    }
}

fn normalize(key: Value, indifferent: bool) -> StrictKey {
    match key.key_name() {
        Some(name) if indifferent => StrictKey(Value::Symbol(name.to_string())),
        _ => StrictKey(key),
    }
}

/// Keys of `actual` outside `expected`, paired with their values.
/// None when `actual` is not map-like.
fn unexpected_entries(
    actual: &Value,
    expected: &KeySource,
    indifferent: bool,
) -> Option<Vec<(Value, Value)>> {
    let keys = actual.key_list()?;
    let expected = KeySet::new(expected.keys(), indifferent);
    Some(
        keys.into_iter()
            .filter(|key| !expected.contains(key))
            .map(|key| {
                let value = actual.lookup(&key, false).cloned().unwrap_or(Value::Null);
                (key, value)
            })
            .collect(),
    )
}

/// Matches maps with no keys beyond the expected set.
#[derive(Debug, Clone)]
pub struct ExtraKeys {
    expected: KeySource,
    indifferent: bool,
    options: Options,
}

impl ExtraKeys {
    pub fn new<I, T>(keys: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::from_source(KeySource::fixed(keys))
    }

    /// Expected keys computed by `f` on every check.
    pub fn dynamic(f: impl Fn() -> Vec<Value> + Send + Sync + 'static) -> Self {
        Self::from_source(KeySource::dynamic(f))
    }

    pub fn from_source(expected: KeySource) -> Self {
        Self {
            expected,
            indifferent: false,
            options: Options::new(),
        }
    }

    /// Treat string and symbol keys with the same name as the same key.
    pub fn indifferent(mut self) -> Self {
        self.indifferent = true;
        self.options = self.options.with("indifferent", true);
        self
    }

    pub fn expected_keys(&self) -> Vec<Value> {
        self.expected.keys()
    }
}

message_options!(ExtraKeys);

impl Constraint for ExtraKeys {
    fn type_token(&self) -> &'static str {
        tokens::EXTRA_KEYS
    }

    fn negated_type_token(&self) -> &'static str {
        tokens::NO_EXTRA_KEYS
    }

    fn options(&self) -> Options {
        self.options.clone()
    }

    fn matches(&self, actual: &Value) -> bool {
        unexpected_entries(actual, &self.expected, self.indifferent)
            .is_some_and(|extra| extra.is_empty())
    }

    fn does_not_match(&self, actual: &Value) -> bool {
        unexpected_entries(actual, &self.expected, self.indifferent)
            .is_some_and(|extra| !extra.is_empty())
    }

    fn update_errors(&self, actual: &Value, errors: &mut ScopedErrors<'_>) {
        let Some(extra) = unexpected_entries(actual, &self.expected, self.indifferent) else {
            add_type_error(errors, "Hash");
            return;
        };
        for (key, value) in extra {
            errors.scope(PathSegment::from_key(&key)).add_with_message(
                self.type_token(),
                data([("value", value)]),
                self.options.message(),
            );
        }
    }

    fn update_negated_errors(&self, _actual: &Value, errors: &mut ScopedErrors<'_>) {
        errors.add_with_message(
            self.negated_type_token(),
            data([("expected", Value::List(self.expected.keys()))]),
            self.options.negated_message(),
        );
    }
}

/// Applies a value constraint to every map entry outside the expected keys.
#[derive(Debug, Clone)]
pub struct VariadicKeys {
    expected: KeySource,
    value: Arc<dyn Constraint>,
    indifferent: bool,
    options: Options,
}

impl VariadicKeys {
    pub fn new(expected: KeySource, value: Arc<dyn Constraint>) -> Self {
        Self {
            expected,
            value,
            indifferent: false,
            options: Options::new(),
        }
    }

    pub fn indifferent(mut self) -> Self {
        self.indifferent = true;
        self
    }

    pub fn value_constraint(&self) -> &Arc<dyn Constraint> {
        &self.value
    }
}

message_options!(VariadicKeys);

impl Constraint for VariadicKeys {
    fn options(&self) -> Options {
        self.options.clone()
    }

    fn matches(&self, actual: &Value) -> bool {
        unexpected_entries(actual, &self.expected, self.indifferent)
            .is_some_and(|extra| extra.iter().all(|(_, value)| self.value.matches(value)))
    }

    fn does_not_match(&self, actual: &Value) -> bool {
        unexpected_entries(actual, &self.expected, self.indifferent).is_some_and(|extra| {
            extra
                .iter()
                .all(|(_, value)| self.value.does_not_match(value))
        })
    }

    fn update_errors(&self, actual: &Value, errors: &mut ScopedErrors<'_>) {
        self.check(actual, errors);
    }

    fn update_negated_errors(&self, actual: &Value, errors: &mut ScopedErrors<'_>) {
        self.check_negated(actual, errors);
    }

    fn check(&self, actual: &Value, errors: &mut ScopedErrors<'_>) -> bool {
        let Some(extra) = unexpected_entries(actual, &self.expected, self.indifferent) else {
            add_type_error(errors, "Hash");
            return false;
        };
        let mut status = true;
        for (key, value) in extra {
            let mut scoped = errors.scope(PathSegment::from_key(&key));
            status &= self.value.check(&value, &mut scoped);
        }
        status
    }

    fn check_negated(&self, actual: &Value, errors: &mut ScopedErrors<'_>) -> bool {
        let Some(extra) = unexpected_entries(actual, &self.expected, self.indifferent) else {
            return false;
        };
        let mut status = true;
        for (key, value) in extra {
            let mut scoped = errors.scope(PathSegment::from_key(&key));
            status &= self.value.check_negated(&value, &mut scoped);
        }
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Type;
    use std::sync::Mutex;
    use vouch_core::{map, path, Map};

    #[test]
    fn test_extra_keys_reported_per_key() {
        // GIVEN
        let constraint = ExtraKeys::new(["a", "b"]);
        let value = Value::from(map! { "a" => 1, "b" => 2, "c" => 3 });

        // WHEN
        let (status, errors) = constraint.evaluate(&value);

        // THEN
        assert!(!status);
        let records = errors.to_flat_vec();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, tokens::EXTRA_KEYS);
        assert_eq!(records[0].path, path!["c"]);
        assert_eq!(records[0].data["value"], Value::Int(3));
    }

    #[test]
    fn test_non_map_fails_with_type_error() {
        let constraint = ExtraKeys::new(["a"]);

        assert!(!constraint.matches(&Value::Int(1)));
        assert!(!constraint.does_not_match(&Value::Int(1)));
        assert_eq!(
            constraint.errors_for(&Value::Int(1)).iter().next().unwrap().kind,
            tokens::IS_NOT_TYPE
        );
    }

    #[test]
    fn test_indifferent_keys() {
        let value = Value::from(Map::new().with(Value::symbol("a"), 1));

        assert!(!ExtraKeys::new(["a"]).matches(&value));
        assert!(ExtraKeys::new(["a"]).indifferent().matches(&value));
    }

    #[test]
    fn test_dynamic_source_is_reevaluated() {
        // GIVEN
        let keys = Arc::new(Mutex::new(vec![Value::from("a")]));
        let source = Arc::clone(&keys);
        let constraint = ExtraKeys::dynamic(move || source.lock().unwrap().clone());
        let value = Value::from(map! { "a" => 1, "b" => 2 });
        assert!(!constraint.matches(&value));

        // WHEN
        keys.lock().unwrap().push(Value::from("b"));

        // THEN
        assert!(constraint.matches(&value));
    }

    #[test]
    fn test_variadic_keys_check_each_extra_value() {
        // GIVEN
        let constraint = VariadicKeys::new(
            KeySource::fixed(["name"]),
            Type::named("Integer").unwrap().into_shared(),
        );
        let value = Value::from(map! { "name" => "x", "width" => 3, "depth" => "deep" });

        // WHEN
        let (status, errors) = constraint.evaluate(&value);

        // THEN
        assert!(!status);
        let records = errors.to_flat_vec();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, path!["depth"]);
        assert_eq!(records[0].kind, tokens::IS_NOT_TYPE);
    }
}
