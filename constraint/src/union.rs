//! Union of constraints.

use std::sync::Arc;

use vouch_core::{tokens, ScopedErrors, Value};

use crate::constraint::{data, message_options, Constraint, Options};
use crate::error::{ConstraintError, ConstraintResult};

/// Matches values satisfying at least one inner constraint.
#[derive(Debug, Clone)]
pub struct Union {
    constraints: Vec<Arc<dyn Constraint>>,
    options: Options,
}

impl Union {
    pub fn new(constraints: Vec<Arc<dyn Constraint>>) -> ConstraintResult<Self> {
        if constraints.is_empty() {
            return Err(ConstraintError::empty("Union", "constraint"));
        }
        Ok(Self {
            constraints,
            options: Options::new(),
        })
    }

    pub fn constraints(&self) -> &[Arc<dyn Constraint>] {
        &self.constraints
    }

    fn descriptors(&self) -> Value {
        Value::List(self.constraints.iter().map(|c| c.descriptor()).collect())
    }
}

message_options!(Union);

impl Constraint for Union {
    fn type_token(&self) -> &'static str {
        tokens::IS_NOT_IN_UNION
    }

    fn negated_type_token(&self) -> &'static str {
        tokens::IS_IN_UNION
    }

    fn options(&self) -> Options {
        self.options.clone()
    }

    fn matches(&self, actual: &Value) -> bool {
        self.constraints.iter().any(|c| c.matches(actual))
    }

    fn does_not_match(&self, actual: &Value) -> bool {
        self.constraints.iter().all(|c| c.does_not_match(actual))
    }

    fn update_errors(&self, _actual: &Value, errors: &mut ScopedErrors<'_>) {
        errors.add_with_message(
            self.type_token(),
            data([("constraints", self.descriptors())]),
            self.options.message(),
        );
    }

    fn update_negated_errors(&self, _actual: &Value, errors: &mut ScopedErrors<'_>) {
        errors.add_with_message(
            self.negated_type_token(),
            data([("constraints", self.descriptors())]),
            self.options.negated_message(),
        );
    }
}
