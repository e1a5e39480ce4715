//! The constraint trait and its configuration map.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use vouch_core::{tokens, Data, Errors, Map, ScopedErrors, Value};

const MESSAGE: &str = "message";
const NEGATED_MESSAGE: &str = "negated_message";

/// Immutable configuration of a constraint.
///
/// Cloning is cheap; every `with` produces a new map and leaves the original untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options(Arc<BTreeMap<String, Value>>);

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of these options with `key` set to `value`.
    pub fn with(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut map = Arc::unwrap_or_clone(self.0);
        map.insert(key.into(), value.into());
        Self(Arc::new(map))
    }

    /// Override the message reported when the value does not match.
    pub fn with_message(self, message: impl Into<String>) -> Self {
        self.with(MESSAGE, Value::String(message.into()))
    }

    /// Override the message reported when the value unexpectedly matches.
    pub fn with_negated_message(self, message: impl Into<String>) -> Self {
        self.with(NEGATED_MESSAGE, Value::String(message.into()))
    }

    /// These options with every entry of `other` layered on top.
    pub fn merge(self, other: &Options) -> Self {
        if other.is_empty() {
            return self;
        }
        let mut map = Arc::unwrap_or_clone(self.0);
        map.extend(other.iter().map(|(k, v)| (k.to_string(), v.clone())));
        Self(Arc::new(map))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn message(&self) -> Option<&str> {
        self.get(MESSAGE).and_then(Value::as_str)
    }

    pub fn negated_message(&self) -> Option<&str> {
        self.get(NEGATED_MESSAGE).and_then(Value::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (Value::symbol(k), v.clone())).collect())
    }
}

/// Build record data from key/value pairs.
pub fn data<const N: usize>(entries: [(&str, Value); N]) -> Data {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// A predicate over a value with paired error generation.
///
/// `update_errors` is only meaningful when `matches` is false, and
/// `update_negated_errors` only when `does_not_match` is false. Callers that
/// need both the verdict and the errors should use [`Constraint::check`] or
/// [`Constraint::evaluate`], which evaluate the predicate once.
pub trait Constraint: fmt::Debug + Send + Sync {
    /// Error type token reported when the value does not match.
    fn type_token(&self) -> &'static str {
        tokens::INVALID
    }

    /// Error type token reported when the value unexpectedly matches.
    fn negated_type_token(&self) -> &'static str {
        tokens::VALID
    }

    fn options(&self) -> Options;

    fn matches(&self, actual: &Value) -> bool;

    /// The negated predicate. Defaults to the logical negation of `matches`;
    /// variants with a stricter negated sense override it.
    fn does_not_match(&self, actual: &Value) -> bool {
        !self.matches(actual)
    }

    fn update_errors(&self, _actual: &Value, errors: &mut ScopedErrors<'_>) {
        let options = self.options();
        errors.add_with_message(self.type_token(), Data::new(), options.message());
    }

    fn update_negated_errors(&self, _actual: &Value, errors: &mut ScopedErrors<'_>) {
        let options = self.options();
        errors.add_with_message(
            self.negated_type_token(),
            Data::new(),
            options.negated_message(),
        );
    }

    /// Evaluate and, on failure, write errors into `errors`.
    fn check(&self, actual: &Value, errors: &mut ScopedErrors<'_>) -> bool {
        if self.matches(actual) {
            return true;
        }
        self.update_errors(actual, errors);
        false
    }

    /// Evaluate the negated predicate and, on failure, write negated errors.
    fn check_negated(&self, actual: &Value, errors: &mut ScopedErrors<'_>) -> bool {
        if self.does_not_match(actual) {
            return true;
        }
        self.update_negated_errors(actual, errors);
        false
    }

    fn errors_for(&self, actual: &Value) -> Errors {
        let mut errors = Errors::new();
        self.update_errors(actual, &mut errors.view());
        errors
    }

    fn negated_errors_for(&self, actual: &Value) -> Errors {
        let mut errors = Errors::new();
        self.update_negated_errors(actual, &mut errors.view());
        errors
    }

    /// Match status and errors in one pass; errors are empty on success.
    fn evaluate(&self, actual: &Value) -> (bool, Errors) {
        let mut errors = Errors::new();
        let status = self.check(actual, &mut errors.view());
        (status, errors)
    }

    fn evaluate_negated(&self, actual: &Value) -> (bool, Errors) {
        let mut errors = Errors::new();
        let status = self.check_negated(actual, &mut errors.view());
        (status, errors)
    }

    /// Type tokens and options, as reported by composite constraints.
    fn descriptor(&self) -> Value {
        Value::Map(
            Map::new()
                .with(Value::symbol("type"), self.type_token())
                .with(Value::symbol("negated_type"), self.negated_type_token())
                .with(Value::symbol("options"), self.options().to_value()),
        )
    }

    /// Move into a shared handle for registration in contracts.
    fn into_shared(self) -> Arc<dyn Constraint>
    where
        Self: Sized + 'static,
    {
        Arc::new(self)
    }
}

/// Adds message-override builders to constraints storing an `options` field.
macro_rules! message_options {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $ty {
                /// Override the message reported when the value does not match.
                pub fn with_message(mut self, message: impl Into<String>) -> Self {
                    self.options = self.options.with_message(message);
                    self
                }

                /// Override the message reported when the value unexpectedly matches.
                pub fn with_negated_message(mut self, message: impl Into<String>) -> Self {
                    self.options = self.options.with_negated_message(message);
                    self
                }
            }
        )+
    };
}

pub(crate) use message_options;
