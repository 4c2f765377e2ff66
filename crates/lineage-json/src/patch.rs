//! JSON overlays with explicit field removal.

use indexmap::IndexMap;
use serde_json::{Map, Value};

/// String commonly used to spell [`Patch::Absent`] inside plain JSON input.
pub const DEFAULT_DELETE_MARKER: &str = "$delete";

/// A JSON value used as the right-hand side of a merge.
///
/// A patch mirrors `serde_json::Value` with one addition: an object entry may
/// be [`Patch::Absent`], which removes that key from the merge target.
/// Arrays are atomic and hold plain JSON values.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    /// The absence sentinel: the key holding it is removed.
    Absent,

    /// Null, boolean, number or string.
    Scalar(Value),

    /// An array, merged as a whole.
    Array(Vec<Value>),

    /// An object, merged key by key.
    Object(IndexMap<String, Patch>),
}

impl Patch {
    /// An object patch with no entries (a no-op overlay on objects).
    pub fn empty() -> Self {
        Patch::Object(IndexMap::new())
    }

    /// Convert a JSON value, reading string values equal to `marker` as
    /// [`Patch::Absent`].
    pub fn from_value_with_marker(value: Value, marker: &str) -> Self {
        match value {
            Value::String(s) if s == marker => Patch::Absent,
            Value::Object(map) => Patch::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Patch::from_value_with_marker(value, marker)))
                    .collect(),
            ),
            other => Patch::from(other),
        }
    }

    /// Returns true for [`Patch::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// Returns true for an object patch without entries.
    pub fn is_empty(&self) -> bool {
        matches!(self, Patch::Object(entries) if entries.is_empty())
    }

    /// Get an object entry.
    pub fn get(&self, key: &str) -> Option<&Patch> {
        match self {
            Patch::Object(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Add or replace an object entry. Non-object patches become objects.
    pub fn with_entry(self, key: impl Into<String>, entry: impl Into<Patch>) -> Self {
        let mut entries = match self {
            Patch::Object(entries) => entries,
            _ => IndexMap::new(),
        };
        entries.insert(key.into(), entry.into());
        Patch::Object(entries)
    }

    /// Mark `key` for removal.
    pub fn without(self, key: impl Into<String>) -> Self {
        self.with_entry(key, Patch::Absent)
    }

    /// The JSON value this patch produces when nothing lies beneath it.
    ///
    /// Absent entries are dropped; an absent root yields `None`.
    pub fn to_value(&self) -> Option<Value> {
        match self {
            Patch::Absent => None,
            Patch::Scalar(value) => Some(value.clone()),
            Patch::Array(items) => Some(Value::Array(items.clone())),
            Patch::Object(entries) => {
                let mut map = Map::new();
                for (key, entry) in entries {
                    if let Some(value) = entry.to_value() {
                        map.insert(key.clone(), value);
                    }
                }
                Some(Value::Object(map))
            }
        }
    }

    /// Render the patch as plain JSON, spelling absent entries as `marker`.
    pub fn to_value_with_marker(&self, marker: &str) -> Value {
        match self {
            Patch::Absent => Value::String(marker.to_string()),
            Patch::Object(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, entry)| (key.clone(), entry.to_value_with_marker(marker)))
                    .collect(),
            ),
            Patch::Scalar(value) => value.clone(),
            Patch::Array(items) => Value::Array(items.clone()),
        }
    }
}

impl From<Value> for Patch {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Patch::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Patch::from(value)))
                    .collect(),
            ),
            Value::Array(items) => Patch::Array(items),
            scalar => Patch::Scalar(scalar),
        }
    }
}

impl From<&Value> for Patch {
    fn from(value: &Value) -> Self {
        Patch::from(value.clone())
    }
}
