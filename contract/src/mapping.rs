//! Value extraction and error scoping for definitions.

use std::borrow::Cow;

use vouch_core::{Path, PathSegment, ScopedErrors, Value};

use crate::error::{ContractError, ContractResult};

/// An ordered list of zero-argument property reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    names: Vec<String>,
    path: Path,
}

impl PropertyPath {
    pub fn new<I, S>(names: I) -> ContractResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(ContractError::EmptyPropertyPath);
        }
        let path = names.iter().map(String::as_str).collect();
        Ok(Self { names, path })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Walk the reads in order. None as soon as a step is unsupported.
    pub fn read<'v>(&self, value: &'v Value) -> Option<Cow<'v, Value>> {
        let mut current = Cow::Borrowed(value);
        for name in &self.names {
            current = match current {
                Cow::Borrowed(value) => value.read(name)?,
                Cow::Owned(value) => Cow::Owned(value.read(name)?.into_owned()),
            };
        }
        Some(current)
    }
}

/// How a definition reaches its sub-value and where its errors land.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Mapping {
    /// The evaluated value itself.
    #[default]
    Identity,
    Property(PropertyPath),
    Key { key: Value, indifferent: bool },
    Index(usize),
}

impl Mapping {
    pub fn key(key: impl Into<Value>) -> Self {
        Mapping::Key {
            key: key.into(),
            indifferent: false,
        }
    }

    pub fn indifferent_key(key: impl Into<Value>) -> Self {
        Mapping::Key {
            key: key.into(),
            indifferent: true,
        }
    }

    /// The mapped sub-value, or None when it is absent.
    pub fn map_value<'v>(&self, value: &'v Value) -> Option<Cow<'v, Value>> {
        match self {
            Mapping::Identity => Some(Cow::Borrowed(value)),
            Mapping::Property(path) => path.read(value),
            Mapping::Key { key, indifferent } => value.lookup(key, *indifferent).map(Cow::Borrowed),
            Mapping::Index(index) => value.item(*index).map(Cow::Borrowed),
        }
    }

    /// A view over `errors` scoped to where this mapping reads from.
    pub fn map_errors<'b>(&self, errors: &'b mut ScopedErrors<'_>) -> ScopedErrors<'b> {
        match self {
            Mapping::Identity => errors.scope_path(&Path::root()),
            Mapping::Property(path) => errors.scope_path(path.path()),
            Mapping::Key { key, .. } => errors.scope(PathSegment::from_key(key)),
            Mapping::Index(index) => errors.scope(*index),
        }
    }

    /// Relative location of the mapped value.
    pub fn path(&self) -> Path {
        match self {
            Mapping::Identity => Path::root(),
            Mapping::Property(path) => path.path().clone(),
            Mapping::Key { key, .. } => Path::root().child(PathSegment::from_key(key)),
            Mapping::Index(index) => Path::root().child(*index),
        }
    }
}
