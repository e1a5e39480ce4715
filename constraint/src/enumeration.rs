//! Enumeration membership constraint.

use std::collections::HashSet;

use vouch_core::{tokens, ScopedErrors, StrictKey, Value};

use crate::constraint::{data, message_options, Constraint, Options};
use crate::error::{ConstraintError, ConstraintResult};

/// Matches values identical to one of a fixed list.
#[derive(Debug, Clone)]
pub struct Enum {
    values: Vec<Value>,
    lookup: HashSet<StrictKey>,
    options: Options,
}

impl Enum {
    pub fn new<I, T>(values: I) -> ConstraintResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(ConstraintError::empty("Enum", "value"));
        }
        let lookup = values.iter().cloned().map(StrictKey).collect();
        Ok(Self {
            options: Options::new().with("expected", Value::List(values.clone())),
            values,
            lookup,
        })
    }

    /// Expected values, in the order given.
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

message_options!(Enum);

impl Constraint for Enum {
    fn type_token(&self) -> &'static str {
        tokens::IS_NOT_IN_LIST
    }

    fn negated_type_token(&self) -> &'static str {
        tokens::IS_IN_LIST
    }

    fn options(&self) -> Options {
        self.options.clone()
    }

    fn matches(&self, actual: &Value) -> bool {
        self.lookup.contains(&StrictKey(actual.clone()))
    }

    fn update_errors(&self, _actual: &Value, errors: &mut ScopedErrors<'_>) {
        errors.add_with_message(
            self.type_token(),
            data([("values", Value::List(self.values.clone()))]),
            self.options.message(),
        );
    }

    fn update_negated_errors(&self, _actual: &Value, errors: &mut ScopedErrors<'_>) {
        errors.add_with_message(
            self.negated_type_token(),
            data([("values", Value::List(self.values.clone()))]),
            self.options.negated_message(),
        );
    }
}
