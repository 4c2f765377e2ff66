//! Stateless deep merge.
//!
//! These functions know nothing about where values came from; the
//! provenance-tracking engine lives in `lineage-merge` and shares the same
//! combination rules through [`combine_arrays`].

use serde_json::{Map, Value};

use crate::options::{ArrayStrategy, MergeOptions};
use crate::patch::Patch;

/// Deep-merge `overlay` onto a copy of `base`.
///
/// - both arrays: combined per [`MergeOptions::array_strategy`]
/// - both objects: merged key by key, one-sided keys are copied
/// - anything else: `overlay` wins wholesale
pub fn merge(base: &Value, overlay: &Value, options: &MergeOptions) -> Value {
    match (base, overlay) {
        (Value::Array(base_items), Value::Array(overlay_items)) => Value::Array(combine_arrays(
            base_items,
            overlay_items,
            options.array_strategy,
        )),
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut result = base_map.clone();
            for (key, value) in overlay_map {
                let merged = match base_map.get(key) {
                    Some(existing) => merge(existing, value, options),
                    None => value.clone(),
                };
                result.insert(key.clone(), merged);
            }
            Value::Object(result)
        }
        _ => overlay.clone(),
    }
}

/// Deep-merge a [`Patch`] onto a copy of `base`.
///
/// Behaves like [`merge`], except that absent entries remove their key from
/// the result. An absent patch at the root leaves `base` unchanged.
pub fn merge_patch(base: &Value, patch: &Patch, options: &MergeOptions) -> Value {
    match (base, patch) {
        (_, Patch::Absent) => base.clone(),
        (Value::Array(base_items), Patch::Array(overlay_items)) => Value::Array(combine_arrays(
            base_items,
            overlay_items,
            options.array_strategy,
        )),
        (Value::Object(base_map), Patch::Object(entries)) => {
            let mut result = base_map.clone();
            for (key, entry) in entries {
                let merged = match base_map.get(key) {
                    Some(existing) if !entry.is_absent() => {
                        Some(merge_patch(existing, entry, options))
                    }
                    _ => entry.to_value(),
                };
                match merged {
                    Some(value) => {
                        result.insert(key.clone(), value);
                    }
                    None => {
                        result.shift_remove(key);
                    }
                }
            }
            Value::Object(result)
        }
        (_, overlay) => overlay.to_value().unwrap_or(Value::Null),
    }
}

/// Left-to-right fold of [`merge`] starting from an empty object.
pub fn merge_all<'a, I>(values: I, options: &MergeOptions) -> Value
where
    I: IntoIterator<Item = &'a Value>,
{
    values
        .into_iter()
        .fold(Value::Object(Map::new()), |merged, value| {
            merge(&merged, value, options)
        })
}

/// Combine two arrays per `strategy`, cloning the items.
pub fn combine_arrays(base: &[Value], overlay: &[Value], strategy: ArrayStrategy) -> Vec<Value> {
    match strategy {
        ArrayStrategy::Replace => overlay.to_vec(),
        ArrayStrategy::Concat => base.iter().chain(overlay).cloned().collect(),
    }
}
