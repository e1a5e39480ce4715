//! Type specifications resolved from names.

use std::fmt;

use vouch_core::{ScopedErrors, Value};

use crate::constraint::data;
use crate::error::{ConstraintError, ConstraintResult};

/// A resolved type a value can be tested against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSpec {
    /// Any non-nil value.
    Object,
    Nil,
    Boolean,
    Integer,
    Float,
    /// Integer or Float.
    Numeric,
    String,
    Symbol,
    Array,
    Hash,
    Proc,
    /// Objects whose class or ancestors include the name.
    Class(String),
}

impl TypeSpec {
    /// Resolve a built-in type name. Unknown names fail.
    pub fn named(name: &str) -> ConstraintResult<Self> {
        let spec = match name {
            "Object" => TypeSpec::Object,
            "Nil" | "NilClass" => TypeSpec::Nil,
            "Boolean" => TypeSpec::Boolean,
            "Integer" => TypeSpec::Integer,
            "Float" => TypeSpec::Float,
            "Numeric" => TypeSpec::Numeric,
            "String" => TypeSpec::String,
            "Symbol" => TypeSpec::Symbol,
            "Array" => TypeSpec::Array,
            "Hash" => TypeSpec::Hash,
            "Proc" => TypeSpec::Proc,
            _ => return Err(ConstraintError::unknown_type(name)),
        };
        Ok(spec)
    }

    /// A user-defined class. Built-in names resolve to their built-in spec.
    pub fn class(name: &str) -> ConstraintResult<Self> {
        if let Ok(spec) = Self::named(name) {
            return Ok(spec);
        }
        if !is_constant_name(name) {
            return Err(ConstraintError::invalid_class_name(name));
        }
        Ok(TypeSpec::Class(name.to_string()))
    }

    /// Resolve a built-in name or one of the given known class names.
    pub fn resolve<S: AsRef<str>>(name: &str, classes: &[S]) -> ConstraintResult<Self> {
        match Self::named(name) {
            Ok(spec) => Ok(spec),
            Err(_) if classes.iter().any(|c| c.as_ref() == name) => Self::class(name),
            Err(e) => Err(e),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TypeSpec::Object => "Object",
            TypeSpec::Nil => "Nil",
            TypeSpec::Boolean => "Boolean",
            TypeSpec::Integer => "Integer",
            TypeSpec::Float => "Float",
            TypeSpec::Numeric => "Numeric",
            TypeSpec::String => "String",
            TypeSpec::Symbol => "Symbol",
            TypeSpec::Array => "Array",
            TypeSpec::Hash => "Hash",
            TypeSpec::Proc => "Proc",
            TypeSpec::Class(name) => name,
        }
    }

    pub fn accepts(&self, actual: &Value) -> bool {
        match self {
            TypeSpec::Object => !actual.is_null(),
            TypeSpec::Nil => actual.is_null(),
            TypeSpec::Boolean => actual.is_bool(),
            TypeSpec::Integer => actual.is_int(),
            TypeSpec::Float => actual.is_float(),
            TypeSpec::Numeric => actual.is_int() || actual.is_float(),
            TypeSpec::String => actual.is_string(),
            TypeSpec::Symbol => actual.is_symbol(),
            TypeSpec::Array => actual.is_list(),
            TypeSpec::Hash => actual.is_map(),
            TypeSpec::Proc => actual.is_callable(),
            TypeSpec::Class(name) => actual.as_object().is_some_and(|o| o.is_a(name)),
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// `Widget`, `Parts::Gear`
fn is_constant_name(name: &str) -> bool {
    !name.is_empty()
        && name.split("::").all(|part| {
            let mut chars = part.chars();
            chars.next().is_some_and(|c| c.is_ascii_uppercase())
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

/// Report that a value is not of the required built-in type.
pub(crate) fn add_type_error(errors: &mut ScopedErrors<'_>, type_name: &str) {
    errors.add(
        vouch_core::tokens::IS_NOT_TYPE,
        data([
            ("type", Value::from(type_name)),
            ("required", Value::Bool(true)),
        ]),
    );
}
