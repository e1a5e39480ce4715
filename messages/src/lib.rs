//! Vouch Messages
//!
//! Default English messages for the error tokens reported by Vouch constraints.
//!
//! Responsibilities:
//! - One template per token in [`vouch_core::tokens::ALL`]
//! - `%{key}` interpolation from a record's data and path
//! - Per-token overrides, in code or from a JSON catalog

use std::collections::HashMap;

use thiserror::Error;
use vouch_core::{tokens, ErrorRecord, MessageGenerator, Value};

/// Result type for catalog loading.
pub type MessagesResult<T> = Result<T, MessagesError>;

/// Errors raised while loading a message catalog.
#[derive(Debug, Error)]
pub enum MessagesError {
    #[error("Invalid message catalog: {0}")]
    InvalidCatalog(#[from] serde_json::Error),

    #[error("Unterminated placeholder in template for {token}")]
    UnterminatedPlaceholder { token: String },
}

const DEFAULTS: &[(&str, &str)] = &[
    (tokens::INVALID, "is invalid"),
    (tokens::VALID, "is valid"),
    (tokens::ANYTHING, "must not be anything"),
    (tokens::NOTHING, "must be something"),
    (tokens::ABSENT, "must be present"),
    (tokens::PRESENT, "must be absent"),
    (tokens::IS_NOT_EQUAL_TO, "must be equal to %{expected}"),
    (tokens::IS_EQUAL_TO, "must not be equal to %{expected}"),
    (tokens::IS_NOT_VALUE, "must be %{expected}"),
    (tokens::IS_VALUE, "must not be %{expected}"),
    (tokens::IS_NOT_TYPE, "must be of type %{type}"),
    (tokens::IS_TYPE, "must not be of type %{type}"),
    (tokens::IS_NOT_IN_LIST, "must be one of %{values}"),
    (tokens::IS_IN_LIST, "must not be one of %{values}"),
    (tokens::IS_NOT_IN_UNION, "must match one of %{constraints}"),
    (tokens::IS_IN_UNION, "must not match any of %{constraints}"),
    (tokens::DOES_NOT_MATCH_FORMAT, "must match format %{format}"),
    (tokens::MATCHES_FORMAT, "must not match format %{format}"),
    (tokens::DOES_NOT_HAVE_METHODS, "must respond to %{missing}"),
    (tokens::HAS_METHODS, "must not respond to %{present}"),
    (tokens::EXTRA_KEYS, "is not an expected key"),
    (tokens::NO_EXTRA_KEYS, "must have keys other than %{expected}"),
    (tokens::EXTRA_ITEMS, "is an extra item"),
    (tokens::NO_EXTRA_ITEMS, "must have more than %{expected} items"),
    (tokens::MISSING_ITEM, "is missing"),
    (tokens::NO_MISSING_ITEMS, "must have fewer than %{expected} items"),
];

/// English message templates keyed by error token.
#[derive(Debug, Clone)]
pub struct DefaultMessages {
    templates: HashMap<String, String>,
}

impl DefaultMessages {
    pub fn new() -> Self {
        let templates = DEFAULTS
            .iter()
            .map(|(token, template)| (token.to_string(), template.to_string()))
            .collect();
        Self { templates }
    }

    /// Replace the template for `token`.
    pub fn with_template(mut self, token: impl Into<String>, template: impl Into<String>) -> Self {
        self.templates.insert(token.into(), template.into());
        self
    }

    /// Apply overrides from a JSON object of `token -> template`.
    ///
    /// Templates are checked for unterminated placeholders before any is applied.
    pub fn with_json(mut self, json: &str) -> MessagesResult<Self> {
        let overrides: HashMap<String, String> = serde_json::from_str(json)?;
        for (token, template) in &overrides {
            if !is_well_formed(template) {
                return Err(MessagesError::UnterminatedPlaceholder {
                    token: token.clone(),
                });
            }
        }
        self.templates.extend(overrides);
        Ok(self)
    }

    pub fn template(&self, token: &str) -> Option<&str> {
        self.templates.get(token).map(String::as_str)
    }

    /// Interpolate `template` with the record's data.
    ///
    /// `%{path}` expands to the record's path unless the data has a `path`
    /// entry. Unknown placeholders are left as written.
    pub fn render(&self, template: &str, record: &ErrorRecord) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(start) = rest.find("%{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                out.push_str(&rest[start..]);
                return out;
            };
            let key = &after[..end];
            match record.data.get(key) {
                Some(value) => out.push_str(&display(value)),
                None if key == "path" => out.push_str(&record.path.to_string()),
                None => out.push_str(&rest[start..start + 3 + end]),
            }
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        out
    }
}

impl Default for DefaultMessages {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageGenerator for DefaultMessages {
    /// Unknown tokens fall back to the token itself.
    fn generate(&self, record: &ErrorRecord) -> String {
        match self.template(&record.kind) {
            Some(template) => self.render(template, record),
            None => record.kind.clone(),
        }
    }
}

fn is_well_formed(template: &str) -> bool {
    let mut rest = template;
    while let Some(start) = rest.find("%{") {
        match rest[start + 2..].find('}') {
            Some(end) => rest = &rest[start + 3 + end..],
            None => return false,
        }
    }
    true
}

/// Strings and symbols render bare; lists are comma separated.
fn display(value: &Value) -> String {
    match value {
        Value::String(s) | Value::Symbol(s) => s.clone(),
        Value::List(items) => items.iter().map(display).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}
