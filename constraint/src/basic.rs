//! Sentinel and presence constraints.

use vouch_core::{tokens, Value};

use crate::constraint::{message_options, Constraint, Options};

/// Matches every value.
#[derive(Debug, Clone, Default)]
pub struct Anything {
    options: Options,
}

impl Anything {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Matches no value.
#[derive(Debug, Clone, Default)]
pub struct Nothing {
    options: Options,
}

impl Nothing {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Matches values that are neither nil nor empty.
#[derive(Debug, Clone, Default)]
pub struct Presence {
    options: Options,
}

impl Presence {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Matches nil and empty values.
#[derive(Debug, Clone, Default)]
pub struct Absence {
    options: Options,
}

impl Absence {
    pub fn new() -> Self {
        Self::default()
    }
}

message_options!(Anything, Nothing, Presence, Absence);

impl Constraint for Anything {
    fn type_token(&self) -> &'static str {
        tokens::NOTHING
    }

    fn negated_type_token(&self) -> &'static str {
        tokens::ANYTHING
    }

    fn options(&self) -> Options {
        self.options.clone()
    }

    fn matches(&self, _actual: &Value) -> bool {
        true
    }
}

impl Constraint for Nothing {
    fn type_token(&self) -> &'static str {
        tokens::ANYTHING
    }

    fn negated_type_token(&self) -> &'static str {
        tokens::NOTHING
    }

    fn options(&self) -> Options {
        self.options.clone()
    }

    fn matches(&self, _actual: &Value) -> bool {
        false
    }
}

impl Constraint for Presence {
    fn type_token(&self) -> &'static str {
        tokens::ABSENT
    }

    fn negated_type_token(&self) -> &'static str {
        tokens::PRESENT
    }

    fn options(&self) -> Options {
        self.options.clone()
    }

    fn matches(&self, actual: &Value) -> bool {
        !actual.is_blank()
    }
}

impl Constraint for Absence {
    fn type_token(&self) -> &'static str {
        tokens::PRESENT
    }

    fn negated_type_token(&self) -> &'static str {
        tokens::ABSENT
    }

    fn options(&self) -> Options {
        self.options.clone()
    }

    fn matches(&self, actual: &Value) -> bool {
        actual.is_blank()
    }
}
