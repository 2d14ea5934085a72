//! Records and record identity.
//!
//! A [`Record`] is an opaque field map. The engine never looks inside a record
//! except through field look-ups, and never mutates one.

use crate::model::value;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

// ===== Record =====

/// A single browsable record: field name → JSON value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Wrap an existing field map.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Convert a JSON value into a record.
    ///
    /// Returns `None` unless the value is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    /// Look up a field. Missing fields are `None`, which is distinct from `null`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Borrow the underlying field map.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Number of fields on this record.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// ===== RecordId =====

/// Stable identity of a record, independent of its position in any page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Create an identifier from any string-like value.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for RecordId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

// ===== Identity extraction =====

/// Caller-supplied identifier function.
pub type IdFn = Arc<dyn Fn(&Record) -> RecordId + Send + Sync>;

/// How a data source derives [`RecordId`]s from records.
#[derive(Clone)]
pub enum Identity {
    /// Stringify the named field. A missing field yields the empty id.
    Field(String),
    /// Delegate to a custom function.
    Custom(IdFn),
}

impl Identity {
    /// Extract the identifier of `record`.
    pub fn id_of(&self, record: &Record) -> RecordId {
        match self {
            Identity::Field(field) => RecordId(value::stringify(record.get(field))),
            Identity::Custom(f) => f(record),
        }
    }
}

impl Default for Identity {
    fn default() -> Self {
        Identity::Field("id".to_string())
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Field(field) => f.debug_tuple("Field").field(field).finish(),
            Identity::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
