//! Equality and identity constraints.

use vouch_core::{tokens, ScopedErrors, Value};

use crate::constraint::{data, message_options, Constraint, Options};

/// Matches values equal to the expected value. Integers and floats compare numerically.
#[derive(Debug, Clone)]
pub struct Equality {
    expected: Value,
    options: Options,
}

impl Equality {
    pub fn new(expected: impl Into<Value>) -> Self {
        let expected = expected.into();
        Self {
            options: Options::new().with("expected", expected.clone()),
            expected,
        }
    }

    pub fn expected(&self) -> &Value {
        &self.expected
    }
}

/// Matches only the expected value itself: same variant, same contents,
/// and for objects and callables the same instance.
#[derive(Debug, Clone)]
pub struct Identity {
    expected: Value,
    options: Options,
}

impl Identity {
    pub fn new(expected: impl Into<Value>) -> Self {
        let expected = expected.into();
        Self {
            options: Options::new().with("expected", expected.clone()),
            expected,
        }
    }

    pub fn expected(&self) -> &Value {
        &self.expected
    }
}

message_options!(Equality, Identity);

impl Constraint for Equality {
    fn type_token(&self) -> &'static str {
        tokens::IS_NOT_EQUAL_TO
    }

    fn negated_type_token(&self) -> &'static str {
        tokens::IS_EQUAL_TO
    }

    fn options(&self) -> Options {
        self.options.clone()
    }

    fn matches(&self, actual: &Value) -> bool {
        actual.loose_eq(&self.expected)
    }

    fn update_errors(&self, _actual: &Value, errors: &mut ScopedErrors<'_>) {
        errors.add_with_message(
            self.type_token(),
            data([("expected", self.expected.clone())]),
            self.options.message(),
        );
    }

    fn update_negated_errors(&self, _actual: &Value, errors: &mut ScopedErrors<'_>) {
        errors.add_with_message(
            self.negated_type_token(),
            data([("expected", self.expected.clone())]),
            self.options.negated_message(),
        );
    }
}

impl Constraint for Identity {
    fn type_token(&self) -> &'static str {
        tokens::IS_NOT_VALUE
    }

    fn negated_type_token(&self) -> &'static str {
        tokens::IS_VALUE
    }

    fn options(&self) -> Options {
        self.options.clone()
    }

    fn matches(&self, actual: &Value) -> bool {
        actual.strict_eq(&self.expected)
    }

    fn update_errors(&self, _actual: &Value, errors: &mut ScopedErrors<'_>) {
        errors.add_with_message(
            self.type_token(),
            data([("expected", self.expected.clone())]),
            self.options.message(),
        );
    }

    fn update_negated_errors(&self, _actual: &Value, errors: &mut ScopedErrors<'_>) {
        errors.add_with_message(
            self.negated_type_token(),
            data([("expected", self.expected.clone())]),
            self.options.negated_message(),
        );
    }
}
