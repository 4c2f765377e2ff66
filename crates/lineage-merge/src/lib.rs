//! Provenance-tracking merge of identified JSON documents.
//!
//! This crate merges an ordered list of sources (an identifier plus a JSON
//! overlay) into one document while recording, for every object attribute at
//! every nesting level, which source last wrote it.
//!
//! # Key Features
//!
//! - **Per-node provenance**: every object of the merged value has its own
//!   [`NodeProvenance`] store, kept beside the value rather than inside it
//! - **Global path index**: a flat dotted-path → [`Provenance`] map, refreshed
//!   after every source
//! - **Explicit deletion**: [`Patch::Absent`] entries remove a key together
//!   with its provenance
//! - **Incremental use**: [`ProvenanceMerger`] accepts sources one at a time
//!
//! # Example
//!
//! ```rust
//! use lineage_merge::{merge_all_with_metadata, MergeOptions, Source};
//! use serde_json::json;
//!
//! let sources = vec![
//!     Source::new("defaults", json!({"name": "Alice", "age": 25})),
//!     Source::new("profile", json!({"name": "Bob"})),
//! ];
//! let merged = merge_all_with_metadata(&sources, &MergeOptions::default());
//!
//! assert_eq!(merged.value(), &json!({"name": "Bob", "age": 25}));
//! assert_eq!(merged.get("name").map(|p| p.source_id), Some("profile"));
//! assert_eq!(merged.get("age").map(|p| p.source_id), Some("defaults"));
//! ```

mod merged;
mod node;
mod types;

pub use types::{LocalStore, Provenance, ProvenanceMap, Source};

pub use node::NodeProvenance;

pub use merged::{MergedDocument, ProvenanceMerger, merge_all_with_metadata};

// Re-export for convenience
pub use lineage_json::{ArrayStrategy, MergeOptions, Patch};
