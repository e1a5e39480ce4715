//! Capability constraint: the value answers to a fixed set of operations.

use vouch_core::{tokens, ScopedErrors, Value, MAP_LIKE_OPERATIONS};

use crate::constraint::{data, message_options, Constraint, Options};
use crate::error::{ConstraintError, ConstraintResult};

/// Matches values answering to every listed operation.
///
/// The negated form is stricter than plain negation: it matches only values
/// answering to none of the operations.
#[derive(Debug, Clone)]
pub struct Signature {
    methods: Vec<String>,
    options: Options,
}

impl Signature {
    pub fn new<I, S>(methods: I) -> ConstraintResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let methods: Vec<String> = methods.into_iter().map(Into::into).collect();
        if methods.is_empty() {
            return Err(ConstraintError::empty("Signature", "method"));
        }
        if methods.iter().any(String::is_empty) {
            return Err(ConstraintError::invalid_argument(
                "method names can't be blank",
            ));
        }
        Ok(Self {
            options: Options::new().with("methods", method_list(&methods)),
            methods,
        })
    }

    /// Indexable, iterable and able to list its keys.
    pub fn map_like() -> Self {
        let methods: Vec<String> = MAP_LIKE_OPERATIONS.iter().map(|m| m.to_string()).collect();
        Self {
            options: Options::new().with("methods", method_list(&methods)),
            methods,
        }
    }

    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    fn partition(&self, actual: &Value) -> (Vec<&str>, Vec<&str>) {
        self.methods
            .iter()
            .map(String::as_str)
            .partition(|m| actual.responds_to(m))
    }
}

fn method_list<S: AsRef<str>>(methods: &[S]) -> Value {
    Value::List(methods.iter().map(|m| Value::from(m.as_ref())).collect())
}

message_options!(Signature);

impl Constraint for Signature {
    fn type_token(&self) -> &'static str {
        tokens::DOES_NOT_HAVE_METHODS
    }

    fn negated_type_token(&self) -> &'static str {
        tokens::HAS_METHODS
    }

    fn options(&self) -> Options {
        self.options.clone()
    }

    fn matches(&self, actual: &Value) -> bool {
        self.methods.iter().all(|m| actual.responds_to(m))
    }

    fn does_not_match(&self, actual: &Value) -> bool {
        !self.methods.iter().any(|m| actual.responds_to(m))
    }

    fn update_errors(&self, actual: &Value, errors: &mut ScopedErrors<'_>) {
        let (_, missing) = self.partition(actual);
        errors.add_with_message(
            self.type_token(),
            data([
                ("methods", method_list(&self.methods)),
                ("missing", method_list(&missing)),
            ]),
            self.options.message(),
        );
    }

    fn update_negated_errors(&self, actual: &Value, errors: &mut ScopedErrors<'_>) {
        let (present, _) = self.partition(actual);
        errors.add_with_message(
            self.negated_type_token(),
            data([
                ("methods", method_list(&self.methods)),
                ("present", method_list(&present)),
            ]),
            self.options.negated_message(),
        );
    }
}
