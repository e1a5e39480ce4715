//! String format constraint.

use regex_lite::Regex;

use vouch_core::{tokens, ScopedErrors, Value};

use crate::constraint::{data, message_options, Constraint, Options};
use crate::error::{ConstraintError, ConstraintResult};
use crate::types::add_type_error;

/// What a string must contain.
#[derive(Debug, Clone)]
pub enum FormatPattern {
    Substring(String),
    Regex(Regex),
}

impl FormatPattern {
    pub fn source(&self) -> &str {
        match self {
            FormatPattern::Substring(s) => s,
            FormatPattern::Regex(re) => re.as_str(),
        }
    }

    fn is_match(&self, text: &str) -> bool {
        match self {
            FormatPattern::Substring(s) => text.contains(s.as_str()),
            FormatPattern::Regex(re) => re.is_match(text),
        }
    }
}

/// Matches strings containing a substring or matching a pattern.
///
/// Non-string values fail with a type error rather than a format error.
#[derive(Debug, Clone)]
pub struct Format {
    pattern: FormatPattern,
    options: Options,
}

impl Format {
    pub fn substring(expected: impl Into<String>) -> Self {
        Self::with_pattern(FormatPattern::Substring(expected.into()))
    }

    pub fn pattern(pattern: &str) -> ConstraintResult<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| ConstraintError::invalid_pattern(pattern, e.to_string()))?;
        Ok(Self::with_pattern(FormatPattern::Regex(regex)))
    }

    fn with_pattern(pattern: FormatPattern) -> Self {
        Self {
            options: Options::new().with("expected", pattern.source()),
            pattern,
        }
    }

    pub fn format(&self) -> &FormatPattern {
        &self.pattern
    }
}

message_options!(Format);

impl Constraint for Format {
    fn type_token(&self) -> &'static str {
        tokens::DOES_NOT_MATCH_FORMAT
    }

    fn negated_type_token(&self) -> &'static str {
        tokens::MATCHES_FORMAT
    }

    fn options(&self) -> Options {
        self.options.clone()
    }

    fn matches(&self, actual: &Value) -> bool {
        actual.as_str().is_some_and(|s| self.pattern.is_match(s))
    }

    fn update_errors(&self, actual: &Value, errors: &mut ScopedErrors<'_>) {
        if !actual.is_string() {
            add_type_error(errors, "String");
            return;
        }
        errors.add_with_message(
            self.type_token(),
            data([("format", Value::from(self.pattern.source()))]),
            self.options.message(),
        );
    }

    fn update_negated_errors(&self, _actual: &Value, errors: &mut ScopedErrors<'_>) {
        errors.add_with_message(
            self.negated_type_token(),
            data([("format", Value::from(self.pattern.source()))]),
            self.options.negated_message(),
        );
    }
}
