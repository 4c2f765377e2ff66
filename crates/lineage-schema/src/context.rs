//! Positional context handed to traversal visitors.

use lineage_json::join_path;
use serde_json::Value;

/// The data paired with a schema node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DataSlot<'a> {
    /// Schema-only traversal: no data is bound at all.
    Unbound,

    /// Data-bound traversal, but the data has nothing at this position.
    Missing,

    /// The data value at this position.
    Present(&'a Value),
}

impl<'a> DataSlot<'a> {
    /// The data value, if one is present.
    pub fn value(&self) -> Option<&'a Value> {
        match *self {
            DataSlot::Present(value) => Some(value),
            _ => None,
        }
    }

    /// True for data-bound traversals, whether or not a value is present.
    pub fn is_bound(&self) -> bool {
        !matches!(self, DataSlot::Unbound)
    }

    pub(crate) fn from_option(value: Option<&'a Value>) -> Self {
        value.map_or(DataSlot::Missing, DataSlot::Present)
    }
}

/// Everything a visitor knows about the node being visited.
///
/// A fresh context is built for every visit and only borrowed by the visitor.
#[derive(Debug, Clone, Copy)]
pub struct TraversalContext<'a> {
    /// The schema node being visited
    pub schema: &'a Value,

    /// Property names leading to this node
    ///
    /// Array items share the path of their array; combinators and
    /// conditionals share the path of the node that owns them.
    pub path: &'a [String],

    /// The property name or stringified item index, when the node was
    /// reached through `properties`, `patternProperties`,
    /// `additionalProperties` or `items`
    pub property_name: Option<&'a str>,

    /// The schema node owning the keyword that led here (`None` at the root)
    pub parent: Option<&'a Value>,

    /// The data at this position
    pub data: DataSlot<'a>,
}

impl TraversalContext<'_> {
    /// The path joined with `.`; the root is the empty string.
    pub fn dotted_path(&self) -> String {
        join_path(self.path)
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_slot() {
        let value = json!(1);
        assert_eq!(DataSlot::Present(&value).value(), Some(&value));
        assert_eq!(DataSlot::Missing.value(), None);
        assert!(DataSlot::Missing.is_bound());
        assert!(!DataSlot::Unbound.is_bound());
        assert_eq!(DataSlot::from_option(None), DataSlot::Missing);
    }

    #[test]
    fn test_dotted_path() {
        let schema = json!({});
        let path = vec!["a".to_string(), "b".to_string()];
        let context = TraversalContext {
            schema: &schema,
            path: &path,
            property_name: Some("b"),
            parent: Some(&schema),
            data: DataSlot::Unbound,
        };
        assert_eq!(context.dotted_path(), "a.b");
        assert!(!context.is_root());
    }
}
