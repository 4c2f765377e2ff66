//! Structural diff producing a [`Patch`].

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::trace;

use crate::equal::deep_equal;
use crate::options::{DiffArrayStrategy, DiffOptions};
use crate::patch::Patch;

/// Compute the overlay that turns `base` into `target`.
///
/// `merge_patch(base, &diff(base, target))` reconstructs `target`:
///
/// - keys only in `base` become [`Patch::Absent`]
/// - deep-equal values produce no entry
/// - differing objects recurse
/// - everything else records `target`'s value wholesale
///
/// When `base` and `target` are not both objects the whole of `target` is
/// returned. Arrays are never diffed element-wise, whatever the
/// [`DiffArrayStrategy`].
pub fn diff(base: &Value, target: &Value, options: &DiffOptions) -> Patch {
    if options.array_strategy == DiffArrayStrategy::Elements {
        trace!("element-wise array diff requested; arrays are recorded wholesale");
    }
    match (base, target) {
        (Value::Object(base_map), Value::Object(target_map)) => {
            Patch::Object(diff_objects(base_map, target_map, options))
        }
        _ => Patch::from(target),
    }
}

/// Diff the first entry of `values` against the last one.
///
/// Intermediate entries do not influence the result: this is not a chained
/// diff. An empty list yields an empty patch.
pub fn diff_all(values: &[Value], options: &DiffOptions) -> Patch {
    match (values.first(), values.last()) {
        (Some(first), Some(last)) => diff(first, last, options),
        _ => Patch::empty(),
    }
}

fn diff_objects(
    base: &Map<String, Value>,
    target: &Map<String, Value>,
    options: &DiffOptions,
) -> IndexMap<String, Patch> {
    let mut changes = IndexMap::new();

    for (key, new_value) in target {
        let Some(old_value) = base.get(key) else {
            changes.insert(key.clone(), Patch::from(new_value));
            continue;
        };
        if deep_equal(old_value, new_value) {
            continue;
        }
        let change = match (old_value, new_value) {
            (Value::Object(old_map), Value::Object(new_map)) => {
                let nested = diff_objects(old_map, new_map, options);
                if nested.is_empty() {
                    Patch::from(new_value)
                } else {
                    Patch::Object(nested)
                }
            }
            _ => Patch::from(new_value),
        };
        changes.insert(key.clone(), change);
    }

    for key in base.keys() {
        if !target.contains_key(key) {
            changes.insert(key.clone(), Patch::Absent);
        }
    }

    changes
}
