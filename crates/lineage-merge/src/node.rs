//! Out-of-band provenance for the objects of a merged value.
//!
//! A [`NodeProvenance`] tree mirrors the objects of a merged `Value`: each
//! node holds the local store of one object (immediate attribute →
//! [`Provenance`]) plus the nodes of its object-valued children. Nothing is
//! written into the value itself, so user keys can never collide with the
//! bookkeeping.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::types::{LocalStore, Provenance, ProvenanceMap};

/// Provenance of one object node of a merged value.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeProvenance<I> {
    pub(crate) local: LocalStore<I>,
    pub(crate) children: IndexMap<String, NodeProvenance<I>>,
}

impl<I> Default for NodeProvenance<I> {
    fn default() -> Self {
        Self {
            local: IndexMap::new(),
            children: IndexMap::new(),
        }
    }
}

impl<I> NodeProvenance<I> {
    /// Provenance of the immediate attribute `key` of this object.
    pub fn get(&self, key: &str) -> Option<&Provenance<I>> {
        self.local.get(key)
    }

    /// The node of an object-valued attribute.
    pub fn child(&self, key: &str) -> Option<&NodeProvenance<I>> {
        self.children.get(key)
    }

    /// Walk down a chain of attribute names.
    pub fn at_path(&self, path: &[&str]) -> Option<&NodeProvenance<I>> {
        let mut current = self;
        for key in path {
            current = current.children.get(*key)?;
        }
        Some(current)
    }

    /// Attributes with a provenance record, in recording order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.local.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.local.len()
    }

    pub fn is_empty(&self) -> bool {
        self.local.is_empty()
    }
}

impl<I: Clone> NodeProvenance<I> {
    /// Flatten the records reachable through `object` into `out`.
    ///
    /// Only attributes currently present in `object` are read, so records
    /// for removed attributes are never surfaced.
    pub(crate) fn collect_into(&self, object: &Map<String, Value>, out: &mut ProvenanceMap<I>) {
        for (key, value) in object {
            if let Some(record) = self.local.get(key) {
                out.insert(record.path.clone(), record.clone());
            }
            if let (Value::Object(child_object), Some(child)) = (value, self.children.get(key)) {
                child.collect_into(child_object, out);
            }
        }
    }
}
