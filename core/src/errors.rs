//! Path-indexed accumulator of violation records.
//!
//! An [`Errors`] owns the ordered record list for one evaluation. A
//! [`ScopedErrors`] borrows that list and prefixes a fixed path onto every
//! record added through it; views nest by reborrowing, so every addition lands
//! in the same backing list in traversal order.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::{Path, PathSegment, Value};

/// Structured details attached to a record, used to interpolate messages.
pub type Data = BTreeMap<String, Value>;

/// Produces a human-readable message for a record.
pub trait MessageGenerator {
    fn generate(&self, record: &ErrorRecord) -> String;
}

/// A single violation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorRecord {
    /// Namespaced error type token, e.g. `vouch.constraints.is_not_type`.
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Data,
    pub message: Option<String>,
    /// Absolute location of the offending value.
    pub path: Path,
}

impl ErrorRecord {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            data: Data::new(),
            message: None,
            path: Path::root(),
        }
    }

    pub fn with_data(mut self, data: Data) -> Self {
        self.data = data;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn at(mut self, path: Path) -> Self {
        self.path = path;
        self
    }
}

/// Ordered collection of violation records for one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Errors {
    records: Vec<ErrorRecord>,
}

impl Errors {
    /// Create a new empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// A view adding records at the root path.
    pub fn view(&mut self) -> ScopedErrors<'_> {
        ScopedErrors {
            records: &mut self.records,
            prefix: Path::root(),
        }
    }

    /// Add a record at the root path.
    pub fn add(&mut self, kind: impl Into<String>, data: Data) -> &mut Self {
        self.view().add(kind, data);
        self
    }

    /// A view adding records below `segment`.
    pub fn scope(&mut self, segment: impl Into<PathSegment>) -> ScopedErrors<'_> {
        ScopedErrors {
            records: &mut self.records,
            prefix: Path::root().child(segment),
        }
    }

    /// A view adding records below `path`.
    pub fn scope_path(&mut self, path: &Path) -> ScopedErrors<'_> {
        ScopedErrors {
            records: &mut self.records,
            prefix: path.clone(),
        }
    }

    /// Records with absolute paths, in insertion order.
    pub fn to_flat_vec(&self) -> Vec<ErrorRecord> {
        self.records.clone()
    }

    pub fn into_records(self) -> Vec<ErrorRecord> {
        self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ErrorRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append another collection's records after this one's.
    pub fn merge(&mut self, other: Errors) {
        self.records.extend(other.records);
    }

    /// Records grouped by absolute path.
    pub fn group_by_path(&self) -> BTreeMap<Path, Vec<&ErrorRecord>> {
        let mut groups: BTreeMap<Path, Vec<&ErrorRecord>> = BTreeMap::new();
        for record in &self.records {
            groups.entry(record.path.clone()).or_default().push(record);
        }
        groups
    }

    /// Records at or below `prefix`, with paths made relative to it.
    pub fn filter_path(&self, prefix: &Path) -> Errors {
        let records = self
            .records
            .iter()
            .filter_map(|record| {
                let path = record.path.strip_prefix(prefix)?;
                Some(ErrorRecord {
                    path,
                    ..record.clone()
                })
            })
            .collect();
        Errors { records }
    }

    /// Fill in messages for records that do not already carry one.
    pub fn with_messages(mut self, generator: &dyn MessageGenerator) -> Self {
        for record in &mut self.records {
            if record.message.is_none() {
                record.message = Some(generator.generate(record));
            }
        }
        self
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, record) in self.records.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let location = if record.path.is_root() {
                "(root)".to_string()
            } else {
                record.path.to_string()
            };
            match &record.message {
                Some(message) => write!(f, "{}: {}", location, message)?,
                None => write!(f, "{}: {}", location, record.kind)?,
            }
        }
        Ok(())
    }
}

impl IntoIterator for Errors {
    type Item = ErrorRecord;
    type IntoIter = std::vec::IntoIter<ErrorRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a Errors {
    type Item = &'a ErrorRecord;
    type IntoIter = std::slice::Iter<'a, ErrorRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl From<Vec<ErrorRecord>> for Errors {
    fn from(records: Vec<ErrorRecord>) -> Self {
        Self { records }
    }
}

/// A handle onto an [`Errors`] backing list that prefixes a fixed path.
#[derive(Debug)]
pub struct ScopedErrors<'a> {
    records: &'a mut Vec<ErrorRecord>,
    prefix: Path,
}

impl<'a> ScopedErrors<'a> {
    /// Path prepended to every record added through this view.
    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    /// Add a record at this view's path.
    pub fn add(&mut self, kind: impl Into<String>, data: Data) -> &mut Self {
        self.add_with_message(kind, data, None)
    }

    /// Add a record carrying an explicit message.
    pub fn add_with_message(
        &mut self,
        kind: impl Into<String>,
        data: Data,
        message: Option<&str>,
    ) -> &mut Self {
        self.records.push(ErrorRecord {
            kind: kind.into(),
            data,
            message: message.map(str::to_string),
            path: self.prefix.clone(),
        });
        self
    }

    /// Add a prepared record; its path is taken as relative to this view.
    pub fn add_record(&mut self, record: ErrorRecord) -> &mut Self {
        let path = self.prefix.join(&record.path);
        self.records.push(ErrorRecord { path, ..record });
        self
    }

    /// Add every record of `errors`, re-rooted below this view.
    pub fn extend(&mut self, errors: Errors) -> &mut Self {
        for record in errors {
            self.add_record(record);
        }
        self
    }

    /// A nested view below `segment`.
    pub fn scope(&mut self, segment: impl Into<PathSegment>) -> ScopedErrors<'_> {
        ScopedErrors {
            records: &mut *self.records,
            prefix: self.prefix.child(segment),
        }
    }

    /// A nested view below `path`.
    pub fn scope_path(&mut self, path: &Path) -> ScopedErrors<'_> {
        ScopedErrors {
            records: &mut *self.records,
            prefix: self.prefix.join(path),
        }
    }

    /// Number of records in the shared backing list, across all views.
    pub fn total(&self) -> usize {
        self.records.len()
    }
}
