//! Value types inspected by constraints.
//!
//! Values are the dynamic data a contract walks. Vouch supports scalar types
//! (Bool, Int, Float, String, Symbol), collections (List, Map) and reference
//! types (Object, Callable). Reference types compare by pointer under strict
//! identity.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

const COMMON_OPERATIONS: &[&str] = &[
    "==",
    "class",
    "inspect",
    "is_a?",
    "nil?",
    "respond_to?",
    "to_s",
];
const NIL_OPERATIONS: &[&str] = &["to_a"];
const BOOL_OPERATIONS: &[&str] = &["!", "&", "|"];
const NUMERIC_OPERATIONS: &[&str] = &[
    "%", "*", "+", "-", "/", "<", "<=", ">", ">=", "abs", "to_f", "to_i", "zero?",
];
const STRING_OPERATIONS: &[&str] = &[
    "+", "=~", "downcase", "empty?", "length", "size", "to_sym", "upcase",
];
const SYMBOL_OPERATIONS: &[&str] = &["length", "size", "to_proc", "to_sym"];
const LIST_OPERATIONS: &[&str] = &[
    "[]", "each", "empty?", "first", "include?", "last", "length", "size", "to_a",
];
const MAP_OPERATIONS: &[&str] = &[
    "[]", "each", "empty?", "key?", "keys", "length", "size", "to_h", "values",
];
const CALLABLE_OPERATIONS: &[&str] = &["arity", "call", "to_proc"];

/// Operations a map-like value must answer to.
pub const MAP_LIKE_OPERATIONS: &[&str] = &["[]", "each", "keys"];

/// A dynamically typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null/missing value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Interned name, distinct from a string with the same text.
    Symbol(String),
    /// Ordered list of values.
    List(Vec<Value>),
    /// Insertion-ordered mapping.
    Map(Map),
    /// Record-like instance of a named class.
    Object(Arc<Object>),
    /// Block or procedure reference.
    Callable(Arc<Callable>),
}

impl Value {
    /// Create a symbol value.
    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    /// Create a list value from anything convertible to values.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Returns true if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this is a boolean value.
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns true if this is an integer value.
    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    /// Returns true if this is a float value.
    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Returns true if this is a string value.
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns true if this is a symbol value.
    pub fn is_symbol(&self) -> bool {
        matches!(self, Value::Symbol(_))
    }

    /// Returns true if this is a list value.
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Returns true if this is a map value.
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Returns true if this is an object value.
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns true if this is a callable value.
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Callable(_))
    }

    /// Get as boolean if this is a Bool value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as integer if this is an Int value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as float if this is a Float value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as string reference if this is a String value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the name of a String or Symbol value.
    pub fn key_name(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Get as slice if this is a List value.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get as map if this is a Map value.
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Get as object if this is an Object value.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Get as callable if this is a Callable value.
    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Callable(callable) => Some(callable),
            _ => None,
        }
    }

    /// Returns the type name of this value. Objects report their class.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "Nil",
            Value::Bool(_) => "Boolean",
            Value::Int(_) => "Integer",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Symbol(_) => "Symbol",
            Value::List(_) => "Array",
            Value::Map(_) => "Hash",
            Value::Object(object) => object.class(),
            Value::Callable(_) => "Proc",
        }
    }

    /// Every operation this value answers to, built-in ones first.
    pub fn operations(&self) -> Vec<&str> {
        let specific: &[&str] = match self {
            Value::Null => NIL_OPERATIONS,
            Value::Bool(_) => BOOL_OPERATIONS,
            Value::Int(_) | Value::Float(_) => NUMERIC_OPERATIONS,
            Value::String(_) => STRING_OPERATIONS,
            Value::Symbol(_) => SYMBOL_OPERATIONS,
            Value::List(_) => LIST_OPERATIONS,
            Value::Map(_) => MAP_OPERATIONS,
            Value::Callable(_) => CALLABLE_OPERATIONS,
            Value::Object(_) => &[],
        };

        let mut operations: Vec<&str> = COMMON_OPERATIONS.iter().chain(specific).copied().collect();
        if let Value::Object(object) = self {
            operations.extend(object.fields.iter().map(|(name, _)| name.as_str()));
            operations.extend(object.methods.iter().map(String::as_str));
        }
        operations
    }

    /// Check whether this value answers to the named operation.
    pub fn responds_to(&self, operation: &str) -> bool {
        if COMMON_OPERATIONS.contains(&operation) {
            return true;
        }
        match self {
            Value::Null => NIL_OPERATIONS.contains(&operation),
            Value::Bool(_) => BOOL_OPERATIONS.contains(&operation),
            Value::Int(_) | Value::Float(_) => NUMERIC_OPERATIONS.contains(&operation),
            Value::String(_) => STRING_OPERATIONS.contains(&operation),
            Value::Symbol(_) => SYMBOL_OPERATIONS.contains(&operation),
            Value::List(_) => LIST_OPERATIONS.contains(&operation),
            Value::Map(_) => MAP_OPERATIONS.contains(&operation),
            Value::Callable(_) => CALLABLE_OPERATIONS.contains(&operation),
            Value::Object(object) => object.responds_to(operation),
        }
    }

    /// Read a zero-argument property. Returns None when the value has no such reader.
    pub fn read(&self, name: &str) -> Option<Cow<'_, Value>> {
        match (self, name) {
            (Value::Object(object), _) => object.get(name).map(Cow::Borrowed),
            (Value::String(s) | Value::Symbol(s), "length" | "size") => {
                Some(Cow::Owned(Value::Int(s.chars().count() as i64)))
            }
            (Value::List(items), "length" | "size") => {
                Some(Cow::Owned(Value::Int(items.len() as i64)))
            }
            (Value::List(items), "first") => items.first().map(Cow::Borrowed),
            (Value::List(items), "last") => items.last().map(Cow::Borrowed),
            (Value::Map(map), "length" | "size") => Some(Cow::Owned(Value::Int(map.len() as i64))),
            (Value::Map(map), "keys") => Some(Cow::Owned(Value::List(map.keys().cloned().collect()))),
            (Value::Map(map), "values") => {
                Some(Cow::Owned(Value::List(map.values().cloned().collect())))
            }
            (Value::Callable(callable), "arity") => {
                Some(Cow::Owned(Value::Int(i64::from(callable.arity()))))
            }
            _ => None,
        }
    }

    /// Indexed access. Only lists support it.
    pub fn item(&self, index: usize) -> Option<&Value> {
        match self {
            Value::List(items) => items.get(index),
            _ => None,
        }
    }

    /// Number of indexed items, if this value has indexed access.
    pub fn item_count(&self) -> Option<usize> {
        match self {
            Value::List(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Key lookup on maps and map-like objects.
    ///
    /// With `indifferent`, string and symbol keys of the same name are interchangeable.
    pub fn lookup(&self, key: &Value, indifferent: bool) -> Option<&Value> {
        match self {
            Value::Map(map) if indifferent => map.get_indifferent(key),
            Value::Map(map) => map.get(key),
            Value::Object(object) if object.is_map_like() => {
                key.key_name().and_then(|name| object.get(name))
            }
            _ => None,
        }
    }

    /// Keys of a map or map-like object, in insertion order.
    pub fn key_list(&self) -> Option<Vec<Value>> {
        match self {
            Value::Map(map) => Some(map.keys().cloned().collect()),
            Value::Object(object) if object.is_map_like() => Some(
                object
                    .fields()
                    .map(|(name, _)| Value::String(name.to_string()))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Null, or an empty string, list or map.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
            Value::Map(map) => map.is_empty(),
            _ => false,
        }
    }

    /// Equality where integers and floats compare numerically.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => (*a as f64) == *b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y))
            }
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, value)| b.get(key).is_some_and(|other| value.loose_eq(other)))
            }
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b) || a == b,
            (Value::Callable(a), Value::Callable(b)) => Arc::ptr_eq(a, b) || a == b,
            _ => self.strict_eq(other),
        }
    }

    /// Identity: same variant and contents, floats by bit pattern, reference
    /// types by pointer.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.strict_eq(y))
            }
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, value)| b.get(key).is_some_and(|other| value.strict_eq(other)))
            }
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Callable(a), Value::Callable(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn hash_strict<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::String(s) | Value::Symbol(s) => s.hash(state),
            Value::List(items) => {
                items.len().hash(state);
                for item in items {
                    item.hash_strict(state);
                }
            }
            // Entry order does not take part in map identity.
            Value::Map(map) => map.len().hash(state),
            Value::Object(object) => (Arc::as_ptr(object) as usize).hash(state),
            Value::Callable(callable) => (Arc::as_ptr(callable) as usize).hash(state),
        }
    }
}

/// Hash-set key comparing values by strict identity.
#[derive(Debug, Clone)]
pub struct StrictKey(pub Value);

impl PartialEq for StrictKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.strict_eq(&other.0)
    }
}

impl Eq for StrictKey {}

impl Hash for StrictKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash_strict(state);
    }
}

/// Insertion-ordered mapping from values to values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Map {
    entries: Vec<(Value, Value)>,
}

impl Map {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing the entry with a strictly equal key.
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k.strict_eq(&key)) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Builder form of [`Map::insert`].
    pub fn with(mut self, key: impl Into<Value>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up by strictly equal key.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.strict_eq(key))
            .map(|(_, v)| v)
    }

    /// Look up treating string and symbol keys with the same name as equal.
    pub fn get_indifferent(&self, key: &Value) -> Option<&Value> {
        self.get(key).or_else(|| {
            let name = key.key_name()?;
            self.entries
                .iter()
                .find(|(k, _)| k.key_name() == Some(name))
                .map(|(_, v)| v)
        })
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Map::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// A record-like instance: a class, its ancestors, readable fields and
/// declared methods.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    class: String,
    ancestors: Vec<String>,
    fields: Vec<(String, Value)>,
    methods: Vec<String>,
}

impl Object {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            ancestors: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Add an ancestor class (superclass or mixed-in module).
    pub fn extends(mut self, ancestor: impl Into<String>) -> Self {
        self.ancestors.push(ancestor.into());
        self
    }

    /// Add a readable field. Setting an existing field replaces its value.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    /// Declare a method the object answers to.
    pub fn with_method(mut self, name: impl Into<String>) -> Self {
        self.methods.push(name.into());
        self
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn ancestors(&self) -> &[String] {
        &self.ancestors
    }

    /// Check membership in a class or any ancestor.
    pub fn is_a(&self, class: &str) -> bool {
        self.class == class || self.ancestors.iter().any(|a| a == class)
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    /// Fields are readers, so an object answers to its field names too.
    pub fn responds_to(&self, operation: &str) -> bool {
        self.methods.iter().any(|m| m == operation) || self.get(operation).is_some()
    }

    /// An object answering to indexing, iteration and key listing.
    pub fn is_map_like(&self) -> bool {
        MAP_LIKE_OPERATIONS.iter().all(|op| self.responds_to(op))
    }
}

/// A block or procedure reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Callable {
    name: String,
    arity: i32,
}

impl Callable {
    pub fn new(name: impl Into<String>, arity: i32) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of declared parameters; negative for variadic blocks.
    pub fn arity(&self) -> i32 {
        self.arity
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{:?}", fl),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Symbol(s) => write!(f, ":{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} => {}", key, value)?;
                }
                write!(f, "}}")
            }
            Value::Object(object) => {
                write!(f, "#<{}", object.class)?;
                for (i, (name, value)) in object.fields.iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    write!(f, "{}{}: {}", sep, name, value)?;
                }
                write!(f, ">")
            }
            Value::Callable(callable) => write!(f, "#<Proc {}>", callable.name),
        }
    }
}

fn key_string(key: &Value) -> String {
    match key.key_name() {
        Some(name) => name.to_string(),
        None => key.to_string(),
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) | Value::Symbol(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map.iter() {
                    out.serialize_entry(&key_string(key), value)?;
                }
                out.end()
            }
            Value::Object(object) => {
                let mut out = serializer.serialize_map(Some(object.fields.len() + 1))?;
                out.serialize_entry("class", &object.class)?;
                for (name, value) in &object.fields {
                    out.serialize_entry(name, value)?;
                }
                out.end()
            }
            Value::Callable(callable) => serializer.serialize_str(&callable_label(callable)),
        }
    }
}

fn callable_label(callable: &Callable) -> String {
    format!("#<Proc {}>", callable.name)
}

// Convenient From implementations
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(Arc::new(object))
    }
}

impl From<Callable> for Value {
    fn from(callable: Callable) -> Self {
        Value::Callable(Arc::new(callable))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Helper macro to create maps with string keys.
#[macro_export]
macro_rules! map {
    () => {
        $crate::Map::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        {
            let mut map = $crate::Map::new();
            $(
                map.insert($crate::Value::from($key), $crate::Value::from($value));
            )+
            map
        }
    };
}
