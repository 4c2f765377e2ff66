//! Input and output records of the annotation projector.

use std::fmt;

use indexmap::IndexMap;
use lineage_json::{MergeOptions, Patch};
use lineage_merge::Source;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Identifier of a contributing document.
///
/// Deserializes from a string or a number; numbers are kept in their
/// JSON spelling, so `1` and `"1"` name the same source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawSourceId", into = "String")]
pub struct SourceId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSourceId {
    Text(String),
    Number(Number),
}

impl From<RawSourceId> for SourceId {
    fn from(raw: RawSourceId) -> Self {
        match raw {
            RawSourceId::Text(text) => SourceId(text),
            RawSourceId::Number(number) => SourceId(number.to_string()),
        }
    }
}

impl From<SourceId> for String {
    fn from(id: SourceId) -> Self {
        id.0
    }
}

impl From<String> for SourceId {
    fn from(id: String) -> Self {
        SourceId(id)
    }
}

impl From<&str> for SourceId {
    fn from(id: &str) -> Self {
        SourceId(id.to_string())
    }
}

impl SourceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One id or a list of ids, as declared on an input object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceIds {
    One(SourceId),
    Many(Vec<SourceId>),
}

impl SourceIds {
    /// The declared ids as a list, in declaration order.
    pub fn into_vec(self) -> Vec<SourceId> {
        match self {
            SourceIds::One(id) => vec![id],
            SourceIds::Many(ids) => ids,
        }
    }
}

impl From<SourceId> for SourceIds {
    fn from(id: SourceId) -> Self {
        SourceIds::One(id)
    }
}

impl From<Vec<SourceId>> for SourceIds {
    fn from(ids: Vec<SourceId>) -> Self {
        SourceIds::Many(ids)
    }
}

/// A JSON document together with the id(s) it is attributed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifiedObject {
    pub id: SourceIds,
    pub data: Value,
}

impl IdentifiedObject {
    pub fn new(id: impl Into<SourceIds>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Convert into a merge source. With a delete marker, string values
    /// equal to it become absent entries.
    pub fn into_source(self, delete_marker: Option<&str>) -> Source<Vec<SourceId>> {
        let data = match delete_marker {
            Some(marker) => Patch::from_value_with_marker(self.data, marker),
            None => Patch::from(self.data),
        };
        Source::new(self.id.into_vec(), data)
    }
}

/// Where an inherited field came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub source_ids: Vec<SourceId>,
    pub inherited_value: Value,
}

/// The UI annotation for one dotted path.
///
/// Only `widget` is managed here; every other key is carried through
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<Widget>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Dotted path → annotation.
pub type UiAnnotations = IndexMap<String, UiAnnotation>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnrichOptions {
    pub merge: MergeOptions,

    /// String spelling of the absence sentinel inside input documents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_marker: Option<String>,
}

impl EnrichOptions {
    pub fn with_delete_marker(mut self, marker: impl Into<String>) -> Self {
        self.delete_marker = Some(marker.into());
        self
    }
}
