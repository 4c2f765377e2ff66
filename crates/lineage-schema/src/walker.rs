//! The traversal engine.
//!
//! Keyword expansion is table driven: [`KEYWORDS`] maps each recognized
//! keyword to the handler that descends into its sub-schemas. Supporting a
//! new keyword means adding one entry.

use regex::Regex;
use serde_json::Value;
use tracing::{debug, trace};

use crate::context::{DataSlot, TraversalContext};

/// Expands one keyword of `owner`, whose value is `argument`.
type KeywordHandler = for<'s> fn(&mut Walker<'_>, &'s Value, &'s Value, DataSlot<'s>);

/// Recognized keywords, in expansion order.
const KEYWORDS: &[(&str, KeywordHandler)] = &[
    ("properties", expand_properties),
    ("patternProperties", expand_pattern_properties),
    ("additionalProperties", expand_additional_properties),
    ("items", expand_items),
    ("allOf", expand_each),
    ("anyOf", expand_each),
    ("oneOf", expand_each),
    ("not", expand_single),
    ("if", expand_single),
    ("then", expand_single),
    ("else", expand_single),
    ("dependentSchemas", expand_dependent_schemas),
];

/// Visit every node of `schema`, without data.
pub fn traverse_schema<F>(schema: &Value, mut visitor: F)
where
    F: FnMut(&TraversalContext<'_>),
{
    let visited = walk(schema, DataSlot::Unbound, &mut visitor);
    debug!(visited, "schema traversal finished");
}

/// Visit `schema` in lock-step with `data`.
///
/// Keywords whose shape does not match the data are skipped:
/// `properties`, `patternProperties`, `additionalProperties` and
/// `dependentSchemas` need an object, `items` needs an array.
pub fn traverse_data<F>(schema: &Value, data: &Value, mut visitor: F)
where
    F: FnMut(&TraversalContext<'_>),
{
    let visited = walk(schema, DataSlot::Present(data), &mut visitor);
    debug!(visited, "schema/data traversal finished");
}

fn walk(
    schema: &Value,
    data: DataSlot<'_>,
    visitor: &mut dyn FnMut(&TraversalContext<'_>),
) -> usize {
    let mut walker = Walker {
        visitor,
        path: Vec::new(),
        visited: 0,
    };
    walker.visit(schema, None, None, data);
    walker.visited
}

struct Walker<'v> {
    visitor: &'v mut dyn FnMut(&TraversalContext<'_>),
    path: Vec<String>,
    visited: usize,
}

impl Walker<'_> {
    /// Visit `node`, then expand its keywords.
    fn visit<'s>(
        &mut self,
        node: &'s Value,
        parent: Option<&'s Value>,
        property_name: Option<&str>,
        data: DataSlot<'s>,
    ) {
        self.visited += 1;
        let context = TraversalContext {
            schema: node,
            path: &self.path,
            property_name,
            parent,
            data,
        };
        (self.visitor)(&context);

        // Non-object schemas (`true`, `false`, ...) have nothing to expand.
        let Value::Object(keywords) = node else {
            return;
        };
        for (keyword, handler) in KEYWORDS {
            if let Some(argument) = keywords.get(*keyword) {
                handler(self, node, argument, data);
            }
        }
    }

    /// Visit `node` one property below the current path.
    fn visit_property<'s>(
        &mut self,
        key: &str,
        node: &'s Value,
        parent: &'s Value,
        data: DataSlot<'s>,
    ) {
        self.path.push(key.to_string());
        self.visit(node, Some(parent), Some(key), data);
        self.path.pop();
    }
}

fn expand_properties<'s>(
    walker: &mut Walker<'_>,
    owner: &'s Value,
    argument: &'s Value,
    data: DataSlot<'s>,
) {
    let Value::Object(properties) = argument else {
        return;
    };
    let object = match data {
        DataSlot::Unbound => None,
        DataSlot::Present(Value::Object(object)) => Some(object),
        _ => {
            trace!(path = ?walker.path, "properties: data is not an object");
            return;
        }
    };
    for (key, schema) in properties {
        // Missing properties are still visited so optional fields show up.
        let child = match object {
            None => DataSlot::Unbound,
            Some(object) => DataSlot::from_option(object.get(key)),
        };
        walker.visit_property(key, schema, owner, child);
    }
}

fn expand_pattern_properties<'s>(
    walker: &mut Walker<'_>,
    owner: &'s Value,
    argument: &'s Value,
    data: DataSlot<'s>,
) {
    let Value::Object(patterns) = argument else {
        return;
    };
    match data {
        DataSlot::Unbound => {
            for schema in patterns.values() {
                walker.visit(schema, Some(owner), None, DataSlot::Unbound);
            }
        }
        DataSlot::Present(Value::Object(object)) => {
            for (pattern, schema) in patterns {
                let Some(regex) = compile_pattern(pattern) else {
                    continue;
                };
                for (key, value) in object {
                    if regex.is_match(key) {
                        walker.visit_property(key, schema, owner, DataSlot::Present(value));
                    }
                }
            }
        }
        _ => trace!(path = ?walker.path, "patternProperties: data is not an object"),
    }
}

fn expand_additional_properties<'s>(
    walker: &mut Walker<'_>,
    owner: &'s Value,
    argument: &'s Value,
    data: DataSlot<'s>,
) {
    if !argument.is_object() {
        return;
    }
    match data {
        DataSlot::Unbound => walker.visit(argument, Some(owner), None, DataSlot::Unbound),
        DataSlot::Present(Value::Object(object)) => {
            let declared = owner.get("properties").and_then(Value::as_object);
            let patterns: Vec<Regex> = owner
                .get("patternProperties")
                .and_then(Value::as_object)
                .map(|patterns| {
                    patterns
                        .keys()
                        .map(String::as_str)
                        .filter_map(compile_pattern)
                        .collect()
                })
                .unwrap_or_default();

            for (key, value) in object {
                let is_declared = declared.is_some_and(|declared| declared.contains_key(key));
                if is_declared || patterns.iter().any(|regex| regex.is_match(key)) {
                    continue;
                }
                walker.visit_property(key, argument, owner, DataSlot::Present(value));
            }
        }
        _ => trace!(path = ?walker.path, "additionalProperties: data is not an object"),
    }
}

fn expand_items<'s>(
    walker: &mut Walker<'_>,
    owner: &'s Value,
    argument: &'s Value,
    data: DataSlot<'s>,
) {
    match (argument, data) {
        (Value::Array(tuple), DataSlot::Unbound) => {
            for (index, schema) in tuple.iter().enumerate() {
                let name = index.to_string();
                walker.visit(schema, Some(owner), Some(name.as_str()), DataSlot::Unbound);
            }
        }
        (schema, DataSlot::Unbound) => walker.visit(schema, Some(owner), None, DataSlot::Unbound),
        (Value::Array(tuple), DataSlot::Present(Value::Array(elements))) => {
            // Positions past the end of the data are not visited.
            for (index, (schema, element)) in tuple.iter().zip(elements).enumerate() {
                let name = index.to_string();
                walker.visit(schema, Some(owner), Some(name.as_str()), DataSlot::Present(element));
            }
        }
        (schema, DataSlot::Present(Value::Array(elements))) => {
            for (index, element) in elements.iter().enumerate() {
                let name = index.to_string();
                walker.visit(schema, Some(owner), Some(name.as_str()), DataSlot::Present(element));
            }
        }
        _ => trace!(path = ?walker.path, "items: data is not an array"),
    }
}

/// `allOf`, `anyOf`, `oneOf`: every member describes the same value.
fn expand_each<'s>(
    walker: &mut Walker<'_>,
    owner: &'s Value,
    argument: &'s Value,
    data: DataSlot<'s>,
) {
    let Value::Array(members) = argument else {
        return;
    };
    for schema in members {
        walker.visit(schema, Some(owner), None, data);
    }
}

/// `not`, `if`, `then`, `else`.
fn expand_single<'s>(
    walker: &mut Walker<'_>,
    owner: &'s Value,
    argument: &'s Value,
    data: DataSlot<'s>,
) {
    if argument.is_object() {
        walker.visit(argument, Some(owner), None, data);
    }
}

fn expand_dependent_schemas<'s>(
    walker: &mut Walker<'_>,
    owner: &'s Value,
    argument: &'s Value,
    data: DataSlot<'s>,
) {
    let Value::Object(dependents) = argument else {
        return;
    };
    match data {
        DataSlot::Unbound => {
            for schema in dependents.values() {
                walker.visit(schema, Some(owner), None, DataSlot::Unbound);
            }
        }
        DataSlot::Present(Value::Object(object)) => {
            for (key, schema) in dependents {
                if object.contains_key(key) {
                    walker.visit(schema, Some(owner), None, data);
                }
            }
        }
        _ => trace!(path = ?walker.path, "dependentSchemas: data is not an object"),
    }
}

fn compile_pattern(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(error) => {
            debug!(pattern, %error, "skipping invalid patternProperties pattern");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// (dotted path, property name) for every visit.
    fn schema_visits(schema: &Value) -> Vec<(String, Option<String>)> {
        let mut visits = Vec::new();
        traverse_schema(schema, |ctx| {
            visits.push((ctx.dotted_path(), ctx.property_name.map(str::to_string)));
        });
        visits
    }

    /// (dotted path, property name, data) for every visit.
    fn data_visits(schema: &Value, data: &Value) -> Vec<(String, Option<String>, Option<Value>)> {
        let mut visits = Vec::new();
        traverse_data(schema, data, |ctx| {
            visits.push((
                ctx.dotted_path(),
                ctx.property_name.map(str::to_string),
                ctx.data.value().cloned(),
            ));
        });
        visits
    }

    fn visit(path: &str, name: Option<&str>) -> (String, Option<String>) {
        (path.to_string(), name.map(str::to_string))
    }

    #[test]
    fn test_nested_properties() {
        let schema = json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "address": {"properties": {"city": {"type": "string"}}}
            }
        });
        assert_eq!(
            schema_visits(&schema),
            vec![
                visit("", None),
                visit("name", Some("name")),
                visit("address", Some("address")),
                visit("address.city", Some("city")),
            ]
        );
    }

    #[test]
    fn test_schema_only_items() {
        let single = json!({"properties": {"tags": {"type": "array", "items": {"type": "string"}}}});
        assert_eq!(
            schema_visits(&single),
            vec![visit("", None), visit("tags", Some("tags")), visit("tags", None)]
        );

        let tuple = json!({"items": [{"type": "string"}, {"type": "number"}]});
        assert_eq!(
            schema_visits(&tuple),
            vec![visit("", None), visit("", Some("0")), visit("", Some("1"))]
        );
    }

    #[test]
    fn test_combinators_share_the_path() {
        let schema = json!({
            "properties": {
                "a": {
                    "allOf": [{"type": "string"}, {"minLength": 1}],
                    "anyOf": [true],
                    "oneOf": [{}],
                    "not": {"const": "x"},
                    "if": {"const": "y"},
                    "then": {"maxLength": 3},
                    "else": false
                }
            }
        });
        let visits = schema_visits(&schema);
        // root, a, two allOf members, anyOf member, oneOf member, not, if, then
        assert_eq!(visits.len(), 9);
        assert!(visits[1..].iter().all(|(path, _)| path == "a"));
        assert!(visits[2..].iter().all(|(_, name)| name.is_none()));
    }

    #[test]
    fn test_schema_only_dependent_and_additional() {
        let schema = json!({
            "dependentSchemas": {"card": {"required": ["billing"]}},
            "additionalProperties": {"type": "string"},
            "patternProperties": {"^x-": {}, "^y-": {}}
        });
        assert_eq!(
            schema_visits(&schema),
            vec![
                visit("", None),
                visit("", None),
                visit("", None),
                visit("", None),
                visit("", None),
            ]
        );

        let closed = json!({"additionalProperties": false});
        assert_eq!(schema_visits(&closed), vec![visit("", None)]);
    }

    #[test]
    fn test_parent_is_the_keyword_owner() {
        let schema = json!({
            "properties": {"a": {"allOf": [{"title": "inner"}]}}
        });
        let mut parents = Vec::new();
        traverse_schema(&schema, |ctx| parents.push(ctx.parent.cloned()));

        assert_eq!(parents[0], None);
        assert_eq!(parents[1].as_ref(), Some(&schema));
        assert_eq!(parents[2].as_ref(), Some(&json!({"allOf": [{"title": "inner"}]})));
    }

    #[test]
    fn test_unrecognized_keywords_are_ignored() {
        let schema = json!({
            "$defs": {"a": {"type": "string"}},
            "definitions": {"b": {}},
            "properties": {"c": {"x-widget": {"properties": {"d": {}}}}}
        });
        assert_eq!(schema_visits(&schema), vec![visit("", None), visit("c", Some("c"))]);
    }

    #[test]
    fn test_non_object_schemas_are_visited_once() {
        let schema = json!({"properties": {"any": true, "none": false, "odd": 3}});
        assert_eq!(schema_visits(&schema).len(), 4);
        assert_eq!(schema_visits(&json!(true)), vec![visit("", None)]);
    }

    #[test]
    fn test_array_items_keep_the_array_path() {
        let schema = json!({"type": "array", "items": {"type": "string"}});
        let data = json!(["p", "q"]);
        assert_eq!(
            data_visits(&schema, &data),
            vec![
                (String::new(), None, Some(json!(["p", "q"]))),
                (String::new(), Some("0".to_string()), Some(json!("p"))),
                (String::new(), Some("1".to_string()), Some(json!("q"))),
            ]
        );
    }

    #[test]
    fn test_tuple_items_stop_at_data_length() {
        let schema = json!({"items": [{"type": "string"}, {"type": "number"}, {}]});
        let visits = data_visits(&schema, &json!(["a", 1]));
        assert_eq!(visits.len(), 3);
        assert_eq!(visits[2].1.as_deref(), Some("1"));
        assert_eq!(visits[2].2, Some(json!(1)));
    }

    #[test]
    fn test_missing_properties_are_still_visited() {
        let schema = json!({
            "properties": {
                "name": {"type": "string"},
                "nested": {"properties": {"inner": {}}}
            }
        });
        let visits = data_visits(&schema, &json!({"name": "Bob"}));
        assert_eq!(
            visits,
            vec![
                (String::new(), None, Some(json!({"name": "Bob"}))),
                ("name".to_string(), Some("name".to_string()), Some(json!("Bob"))),
                // Missing object: visited, but its properties are not expanded.
                ("nested".to_string(), Some("nested".to_string()), None),
            ]
        );
    }

    #[test]
    fn test_missing_data_is_distinguished_from_unbound() {
        let schema = json!({"properties": {"gone": {}}});
        fn describe(slot: DataSlot<'_>) -> &'static str {
            match slot {
                DataSlot::Unbound => "unbound",
                DataSlot::Missing => "missing",
                DataSlot::Present(_) => "present",
            }
        }

        let mut slots = Vec::new();
        traverse_data(&schema, &json!({}), |ctx| slots.push(describe(ctx.data)));
        assert_eq!(slots, vec!["present", "missing"]);

        let mut slots = Vec::new();
        traverse_schema(&schema, |ctx| slots.push(describe(ctx.data)));
        assert_eq!(slots, vec!["unbound", "unbound"]);
    }

    #[test]
    fn test_shape_mismatch_skips_keyword() {
        let schema = json!({
            "properties": {"a": {}},
            "items": {"type": "string"},
            "dependentSchemas": {"a": {}}
        });
        assert_eq!(data_visits(&schema, &json!("text")).len(), 1);
        assert_eq!(data_visits(&schema, &json!([1])).len(), 2);
        assert_eq!(data_visits(&schema, &json!({"a": 1})).len(), 3);
    }

    #[test]
    fn test_combinators_pass_data_through() {
        let schema = json!({"anyOf": [{"type": "string"}, {"type": "number"}], "not": {"const": 0}});
        let visits = data_visits(&schema, &json!(5));
        assert_eq!(visits.len(), 4);
        assert!(visits.iter().all(|(_, _, data)| data == &Some(json!(5))));
    }

    #[test]
    fn test_dependent_schemas_follow_present_keys() {
        let schema = json!({
            "dependentSchemas": {
                "card": {"properties": {"billing": {}}},
                "bank": {"properties": {"iban": {}}}
            }
        });
        let visits = data_visits(&schema, &json!({"card": "1234", "billing": "home"}));
        assert_eq!(
            visits,
            vec![
                (String::new(), None, Some(json!({"card": "1234", "billing": "home"}))),
                (String::new(), None, Some(json!({"card": "1234", "billing": "home"}))),
                ("billing".to_string(), Some("billing".to_string()), Some(json!("home"))),
            ]
        );
    }

    #[test]
    fn test_pattern_and_additional_properties_with_data() {
        let schema = json!({
            "properties": {"name": {}},
            "patternProperties": {"^x-": {"type": "string"}, "(": {}},
            "additionalProperties": {"type": "number"}
        });
        let data = json!({"name": "n", "x-color": "red", "width": 3});
        let visits: Vec<_> = data_visits(&schema, &data)
            .into_iter()
            .map(|(path, name, _)| (path, name))
            .collect();
        assert_eq!(
            visits,
            vec![
                visit("", None),
                visit("name", Some("name")),
                visit("x-color", Some("x-color")),
                visit("width", Some("width")),
            ]
        );
    }

    #[test]
    fn test_visit_order_snapshot() {
        let schema = json!({
            "properties": {
                "profile": {
                    "properties": {"name": {}, "tags": {"items": {}}},
                    "if": {"properties": {"name": {"const": "x"}}}
                }
            }
        });
        let data = json!({"profile": {"name": "x", "tags": ["a"]}});
        let mut lines = Vec::new();
        traverse_data(&schema, &data, |ctx| {
            lines.push(format!(
                "{}|{}|{}",
                ctx.dotted_path(),
                ctx.property_name.unwrap_or("-"),
                ctx.data.value().map_or("missing".to_string(), Value::to_string)
            ));
        });
        insta::assert_snapshot!(lines.join("\n"), @r#"
        |-|{"profile":{"name":"x","tags":["a"]}}
        profile|profile|{"name":"x","tags":["a"]}
        profile.name|name|"x"
        profile.tags|tags|["a"]
        profile.tags|0|"a"
        profile|-|{"name":"x","tags":["a"]}
        profile.name|name|"x"
        "#);
    }
}
