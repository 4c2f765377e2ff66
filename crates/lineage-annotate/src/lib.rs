//! Provenance-driven UI annotations for JSON-Schema forms.
//!
//! [`enrich_schema`] merges a batch of identified objects with
//! [`lineage_merge`], walks the schema over the merged document with
//! [`lineage_schema`], and writes a `widget` annotation recording the
//! contributing ids and the inherited value at every path the merge has
//! provenance for.
//!
//! # Example
//!
//! ```rust
//! use lineage_annotate::{EnrichOptions, IdentifiedObject, SourceId, UiAnnotations, enrich_schema};
//! use serde_json::json;
//!
//! let schema = json!({"properties": {"theme": {"type": "string"}}});
//! let objects = vec![
//!     IdentifiedObject::new(SourceId::from("site"), json!({"theme": "light"})),
//!     IdentifiedObject::new(SourceId::from("page"), json!({"theme": "dark"})),
//! ];
//!
//! let mut ui = UiAnnotations::new();
//! let result = enrich_schema(&schema, &mut ui, objects, &EnrichOptions::default());
//!
//! assert_eq!(result.merged, json!({"theme": "dark"}));
//! let widget = ui["theme"].widget.as_ref().unwrap();
//! assert_eq!(widget.source_ids, vec![SourceId::from("page")]);
//! ```

mod enrich;
mod types;

pub use enrich::{Enrichment, enrich_schema};

pub use types::{
    EnrichOptions, IdentifiedObject, SourceId, SourceIds, UiAnnotation, UiAnnotations, Widget,
};
