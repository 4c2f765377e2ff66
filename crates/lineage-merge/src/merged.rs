//! The provenance merge engine.
//!
//! Sources are folded onto a running document one at a time. Each fold is a
//! recursive walk over the source overlay that threads the local store of
//! the enclosing object through the recursion as an explicit output
//! parameter:
//!
//! - arrays and scalars record themselves into the enclosing store
//! - objects build a fresh store seeded from the previous one, merge their
//!   keys into it, and then record themselves into the enclosing store
//! - absent entries delete the key and its record
//!
//! After every fold the global path index is refreshed from the live tree.
//!
//! # Example
//!
//! ```rust
//! use lineage_merge::{MergeOptions, Patch, ProvenanceMerger};
//! use serde_json::json;
//!
//! let mut merger = ProvenanceMerger::new(MergeOptions::default());
//! merger.push("base", &Patch::from(json!({"x": 1, "y": 2})));
//! merger.push("edit", &Patch::empty().without("x"));
//!
//! let merged = merger.finish();
//! assert_eq!(merged.value(), &json!({"y": 2}));
//! assert!(merged.get("x").is_none());
//! ```

use lineage_json::{MergeOptions, Patch, combine_arrays, join_path};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::node::NodeProvenance;
use crate::types::{LocalStore, Provenance, ProvenanceMap, Source};

/// Incrementally merges sources while tracking provenance.
#[derive(Debug, Clone)]
pub struct ProvenanceMerger<I> {
    options: MergeOptions,
    value: Value,
    root: Option<NodeProvenance<I>>,
    by_path: ProvenanceMap<I>,
    passes: usize,
}

/// The result of a provenance merge.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedDocument<I> {
    value: Value,
    root: Option<NodeProvenance<I>>,
    by_path: ProvenanceMap<I>,
}

/// Per-source settings shared by every step of one fold.
struct Step<'a, I> {
    source_id: &'a I,
    options: &'a MergeOptions,
}

/// Merge `sources` in order into one document.
pub fn merge_all_with_metadata<I: Clone>(
    sources: &[Source<I>],
    options: &MergeOptions,
) -> MergedDocument<I> {
    let mut merger = ProvenanceMerger::new(options.clone());
    for source in sources {
        merger.push(source.id.clone(), &source.data);
    }
    merger.finish()
}

impl<I: Clone> ProvenanceMerger<I> {
    /// Start from an empty object.
    pub fn new(options: MergeOptions) -> Self {
        Self {
            options,
            value: Value::Object(Map::new()),
            root: Some(NodeProvenance::default()),
            by_path: ProvenanceMap::new(),
            passes: 0,
        }
    }

    /// Fold one source onto the running document.
    pub fn push(&mut self, source_id: I, data: &Patch) {
        let step = Step {
            source_id: &source_id,
            options: &self.options,
        };
        let target = std::mem::take(&mut self.value);
        let target_node = self.root.take();
        let mut path = Vec::new();

        let (value, node) = merge_step(&step, target, target_node, data, &mut path, None);
        self.value = value;
        self.root = node;
        self.refresh_index();
        self.passes += 1;

        debug!(
            pass = self.passes,
            paths = self.by_path.len(),
            "merged source into document"
        );
    }

    /// The document merged so far.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Dotted path → provenance for the document merged so far.
    pub fn provenance(&self) -> &ProvenanceMap<I> {
        &self.by_path
    }

    /// Number of sources merged so far.
    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn finish(self) -> MergedDocument<I> {
        MergedDocument {
            value: self.value,
            root: self.root,
            by_path: self.by_path,
        }
    }

    /// Re-read every live object's local store into the global index.
    ///
    /// Entries for paths that no longer exist are purged; surviving paths
    /// keep their position in the index.
    fn refresh_index(&mut self) {
        let mut live = ProvenanceMap::new();
        if let (Value::Object(object), Some(root)) = (&self.value, &self.root) {
            root.collect_into(object, &mut live);
        }

        let before = self.by_path.len();
        self.by_path.retain(|path, _| live.contains_key(path));
        let purged = before - self.by_path.len();
        if purged > 0 {
            trace!(purged, "dropped provenance of removed paths");
        }
        self.by_path.extend(live);
    }
}

impl<I> MergedDocument<I> {
    /// The merged value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Dotted path → provenance.
    pub fn provenance(&self) -> &ProvenanceMap<I> {
        &self.by_path
    }

    /// Provenance of a dotted path.
    pub fn get(&self, path: &str) -> Option<&Provenance<I>> {
        self.by_path.get(path)
    }

    /// The local provenance of the object found by following `path`.
    ///
    /// Returns `None` when the path does not lead to an object, including
    /// when the merged root itself is not an object.
    pub fn node(&self, path: &[&str]) -> Option<&NodeProvenance<I>> {
        self.root.as_ref()?.at_path(path)
    }

    pub fn into_parts(self) -> (Value, ProvenanceMap<I>) {
        (self.value, self.by_path)
    }
}

/// Merge `source` onto `target` at `path`.
///
/// `target_node` is the provenance of `target` when it is an object. The
/// record for `path` itself is written into `parent` (the enclosing object's
/// local store), which is `None` at the root. Returns the merged value and
/// its provenance node when the result is an object.
fn merge_step<I: Clone>(
    step: &Step<'_, I>,
    target: Value,
    target_node: Option<NodeProvenance<I>>,
    source: &Patch,
    path: &mut Vec<String>,
    parent: Option<&mut LocalStore<I>>,
) -> (Value, Option<NodeProvenance<I>>) {
    match source {
        Patch::Absent => {
            // Keys are removed by the enclosing object; only the root lands here.
            if let (Some(store), Some(key)) = (parent, path.last()) {
                store.shift_remove(key);
            }
            (target, target_node)
        }
        Patch::Array(items) => {
            let merged = match &target {
                Value::Array(existing) => {
                    combine_arrays(existing, items, step.options.array_strategy)
                }
                _ => items.clone(),
            };
            let value = Value::Array(merged);
            record(step, parent, path, value.clone());
            (value, None)
        }
        Patch::Scalar(scalar) => {
            record(step, parent, path, scalar.clone());
            (scalar.clone(), None)
        }
        Patch::Object(entries) => {
            let (mut result, mut node) = match target {
                Value::Object(object) => (object, target_node.unwrap_or_default()),
                _ => (Map::new(), NodeProvenance::default()),
            };
            node.local.retain(|key, _| result.contains_key(key));
            node.children.retain(|key, _| result.contains_key(key));

            for (key, entry) in entries {
                if entry.is_absent() {
                    result.shift_remove(key);
                    node.local.shift_remove(key);
                    node.children.shift_remove(key);
                    trace!(path = %join_path(path.as_slice()), key = %key, "removed attribute");
                    continue;
                }

                let child_target = result.get_mut(key).map(std::mem::take).unwrap_or_default();
                let child_node = node.children.shift_remove(key);

                path.push(key.clone());
                let (merged, merged_node) = merge_step(
                    step,
                    child_target,
                    child_node,
                    entry,
                    path,
                    Some(&mut node.local),
                );
                path.pop();

                result.insert(key.clone(), merged);
                if let Some(child) = merged_node {
                    node.children.insert(key.clone(), child);
                }
            }

            let value = Value::Object(result);
            record(step, parent, path, value.clone());
            (value, Some(node))
        }
    }
}

/// Record `value` as written by the current source at `path`.
fn record<I: Clone>(
    step: &Step<'_, I>,
    parent: Option<&mut LocalStore<I>>,
    path: &[String],
    value: Value,
) {
    if let (Some(store), Some(key)) = (parent, path.last()) {
        store.insert(
            key.clone(),
            Provenance {
                source_id: step.source_id.clone(),
                path: join_path(path),
                value,
            },
        );
    }
}
