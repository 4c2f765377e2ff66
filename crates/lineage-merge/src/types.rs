//! Core type definitions for provenance merging.

use indexmap::IndexMap;
use lineage_json::Patch;
use serde::Serialize;
use serde_json::Value;

/// An identified JSON document contributing to a merge.
///
/// Identifiers need not be unique: later sources take precedence over
/// earlier ones for every path they touch.
#[derive(Debug, Clone, PartialEq)]
pub struct Source<I> {
    /// Who contributed this document
    pub id: I,

    /// The overlay applied to the running merge
    pub data: Patch,
}

impl<I> Source<I> {
    pub fn new(id: I, data: impl Into<Patch>) -> Self {
        Self {
            id,
            data: data.into(),
        }
    }
}

/// Which source last set the value at a path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance<I> {
    /// The source that last wrote this path
    pub source_id: I,

    /// Dotted path of the attribute within the merged document
    pub path: String,

    /// Snapshot of the value as written by `source_id`
    pub value: Value,
}

/// Provenance of the immediate children of one object, keyed by attribute.
pub type LocalStore<I> = IndexMap<String, Provenance<I>>;

/// Provenance of a whole document, keyed by dotted path.
pub type ProvenanceMap<I> = IndexMap<String, Provenance<I>>;
