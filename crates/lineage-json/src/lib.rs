//! JSON value vocabulary shared by the lineage crates.
//!
//! This crate owns everything the merge engines agree on about plain JSON:
//!
//! - [`Patch`]: a JSON overlay that can also say "remove this key"
//! - [`deep_equal`]: structural equality over `serde_json::Value`
//! - [`merge`], [`merge_patch`], [`merge_all`]: stateless deep merge
//! - [`diff`], [`diff_all`]: structural diff producing a [`Patch`]
//! - [`MergeOptions`], [`DiffOptions`]: array combination strategies
//!
//! # Example
//!
//! ```rust
//! use lineage_json::{diff, merge_patch, DiffOptions, MergeOptions};
//! use serde_json::json;
//!
//! let before = json!({"title": "Draft", "tags": ["a"]});
//! let after = json!({"title": "Final"});
//!
//! let patch = diff(&before, &after, &DiffOptions::default());
//! assert_eq!(merge_patch(&before, &patch, &MergeOptions::default()), after);
//! ```

mod diff;
mod equal;
mod merge;
mod options;
mod patch;
mod path;

pub use diff::{diff, diff_all};

pub use equal::deep_equal;

pub use merge::{combine_arrays, merge, merge_all, merge_patch};

pub use options::{
    ArrayStrategy,
    ConfigError,
    DiffArrayStrategy,
    DiffOptions,
    MergeOptions,
};

pub use patch::{DEFAULT_DELETE_MARKER, Patch};

pub use path::{PATH_SEPARATOR, join_path};
