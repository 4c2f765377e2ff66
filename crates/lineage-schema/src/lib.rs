//! Schema traversal for JSON-Schema-shaped trees.
//!
//! Two depth-first, pre-order walks are provided:
//!
//! - [`traverse_schema`] visits every schema node reachable through the
//!   recognized keywords
//! - [`traverse_data`] walks a schema and a data value in lock-step, only
//!   expanding keywords whose shape matches the data
//!
//! Both hand every visited node to a visitor closure as a
//! [`TraversalContext`]. Neither walk fails: shape mismatches skip the
//! keyword and non-object schema nodes are visited but not expanded.
//!
//! Recognized keywords: `properties`, `patternProperties`,
//! `additionalProperties`, `items`, `allOf`, `anyOf`, `oneOf`, `not`, `if`,
//! `then`, `else`, `dependentSchemas`. Anything else is ignored.
//!
//! # Example
//!
//! ```rust
//! use lineage_schema::traverse_data;
//! use serde_json::json;
//!
//! let schema = json!({"type": "object", "properties": {"name": {"type": "string"}}});
//! let data = json!({"name": "Bob"});
//!
//! let mut seen = Vec::new();
//! traverse_data(&schema, &data, |ctx| seen.push(ctx.dotted_path()));
//! assert_eq!(seen, vec!["", "name"]);
//! ```

mod context;
mod walker;

pub use context::{DataSlot, TraversalContext};

pub use walker::{traverse_data, traverse_schema};
