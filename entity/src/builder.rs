//! EntityDef for constructing an immutable Entity.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;
use vouch_constraint::{Constraint, ConstraintError, Type, TypeSpec};
use vouch_contract::{Contract, ContractError};

use crate::{AttrDef, Entity, EntitySchema};

/// Result type for entity construction.
pub type EntityResult<T> = Result<T, EntityError>;

/// Errors that can occur during entity construction.
#[derive(Debug, Error)]
pub enum EntityError {
    #[error("Duplicate attribute {name} on {class}")]
    DuplicateAttribute { class: String, name: String },

    #[error("Invalid schema: {0}")]
    InvalidSchema(#[from] serde_json::Error),

    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    #[error(transparent)]
    Contract(#[from] ContractError),
}

/// Builder for an [`Entity`].
#[derive(Debug)]
pub struct EntityDef {
    class: String,
    attributes: Vec<AttrDef>,
    constraints: Vec<(Vec<String>, Arc<dyn Constraint>)>,
    known_classes: Vec<String>,
    parents: Vec<Entity>,
}

impl EntityDef {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            attributes: Vec::new(),
            constraints: Vec::new(),
            known_classes: Vec::new(),
            parents: Vec::new(),
        }
    }

    pub fn from_schema(schema: EntitySchema) -> Self {
        let mut def = Self::new(schema.class);
        def.attributes = schema.attributes;
        def.known_classes = schema.known_classes;
        def
    }

    /// Parse a JSON [`EntitySchema`].
    pub fn from_json(json: &str) -> EntityResult<Self> {
        let schema: EntitySchema = serde_json::from_str(json)?;
        Ok(Self::from_schema(schema))
    }

    pub fn attribute(mut self, attr: AttrDef) -> Self {
        self.attributes.push(attr);
        self
    }

    /// Attach a constraint to the value reached by reading `path` in order.
    pub fn constraint<I, S>(mut self, path: I, constraint: Arc<dyn Constraint>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path = path.into_iter().map(Into::into).collect();
        self.constraints.push((path, constraint));
        self
    }

    /// Allow attribute types to name `class`.
    pub fn known_class(mut self, class: impl Into<String>) -> Self {
        self.known_classes.push(class.into());
        self
    }

    /// Inherit the attributes and constraints of `parent`.
    pub fn extends(mut self, parent: &Entity) -> Self {
        self.parents.push(parent.clone());
        self
    }

    /// Build the immutable Entity.
    pub fn build(self) -> EntityResult<Entity> {
        // Check attribute names across the hierarchy
        let mut names = HashSet::new();
        let inherited = self.parents.iter().flat_map(|p| p.attributes().iter());
        for attr in inherited.chain(&self.attributes) {
            if !names.insert(attr.name.as_str()) {
                return Err(EntityError::DuplicateAttribute {
                    class: self.class.clone(),
                    name: attr.name.clone(),
                });
            }
        }

        let mut known_classes = self.known_classes.clone();
        known_classes.push(self.class.clone());
        known_classes.extend(self.parents.iter().map(|p| p.class().to_string()));

        let contract = Contract::new();
        for parent in &self.parents {
            contract.include(parent.contract())?;
        }
        contract.add_sanity_constraint(Type::new(TypeSpec::class(&self.class)?).into_shared());

        for attr in &self.attributes {
            let spec = TypeSpec::resolve(&attr.type_name, &known_classes)?;
            let constraint = if attr.nullable {
                Type::new(spec).optional()
            } else {
                Type::new(spec)
            };
            contract.add_property_constraint([attr.name.as_str()], constraint.into_shared())?;
        }
        for (path, constraint) in self.constraints {
            contract.add_property_constraint(path, constraint)?;
        }

        debug!(
            class = %self.class,
            attributes = self.attributes.len(),
            "built entity"
        );

        let mut attributes: Vec<AttrDef> = self
            .parents
            .iter()
            .flat_map(|p| p.attributes().iter().cloned())
            .collect();
        attributes.extend(self.attributes);

        Ok(Entity::new(self.class, attributes, contract))
    }
}
