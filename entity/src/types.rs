//! Attribute and schema definitions.

use serde::Deserialize;

/// A typed attribute read from the entity by name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttrDef {
    /// Attribute name.
    pub name: String,
    /// Type name: a built-in (`String`, `Integer`, ...) or a known class.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Whether this attribute can be nil.
    #[serde(default)]
    pub nullable: bool,
}

impl AttrDef {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            nullable: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// Entity definition as data, e.g. loaded from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EntitySchema {
    pub class: String,
    #[serde(default)]
    pub attributes: Vec<AttrDef>,
    /// Class names attribute types may refer to besides the built-ins.
    #[serde(default)]
    pub known_classes: Vec<String>,
}
