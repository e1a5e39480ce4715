//! Type membership constraint.

use vouch_core::{tokens, Data, ScopedErrors, Value};

use crate::constraint::{data, message_options, Constraint, Options};
use crate::error::ConstraintResult;
use crate::types::TypeSpec;

/// Matches values of the expected type; optional types also accept nil.
#[derive(Debug, Clone)]
pub struct Type {
    expected: TypeSpec,
    required: bool,
    options: Options,
}

impl Type {
    pub fn new(expected: TypeSpec) -> Self {
        let options = Options::new()
            .with("expected_type", expected.name())
            .with("required", true);
        Self {
            expected,
            required: true,
            options,
        }
    }

    /// Resolve `name` eagerly; unknown type names fail here rather than at evaluation.
    pub fn named(name: &str) -> ConstraintResult<Self> {
        Ok(Self::new(TypeSpec::named(name)?))
    }

    /// Accept nil in addition to the expected type.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self.options = self.options.with("required", false);
        self
    }

    pub fn expected(&self) -> &TypeSpec {
        &self.expected
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    fn error_data(&self) -> Data {
        data([
            ("type", Value::from(self.expected.name())),
            ("required", Value::Bool(self.required)),
        ])
    }
}

message_options!(Type);

impl Constraint for Type {
    fn type_token(&self) -> &'static str {
        tokens::IS_NOT_TYPE
    }

    fn negated_type_token(&self) -> &'static str {
        tokens::IS_TYPE
    }

    fn options(&self) -> Options {
        self.options.clone()
    }

    fn matches(&self, actual: &Value) -> bool {
        (!self.required && actual.is_null()) || self.expected.accepts(actual)
    }

    fn update_errors(&self, _actual: &Value, errors: &mut ScopedErrors<'_>) {
        errors.add_with_message(self.type_token(), self.error_data(), self.options.message());
    }

    fn update_negated_errors(&self, _actual: &Value, errors: &mut ScopedErrors<'_>) {
        errors.add_with_message(
            self.negated_type_token(),
            self.error_data(),
            self.options.negated_message(),
        );
    }
}
