//! Schema enrichment: merge identified objects, then annotate every schema
//! position the merge has provenance for.

use lineage_merge::{ProvenanceMap, merge_all_with_metadata};
use lineage_schema::traverse_data;
use serde_json::Value;
use tracing::debug;

use crate::types::{EnrichOptions, IdentifiedObject, SourceId, UiAnnotations, Widget};

/// Result of [`enrich_schema`].
#[derive(Debug, Clone)]
pub struct Enrichment<'s> {
    /// The input schema, unchanged
    pub schema: &'s Value,

    /// All objects merged in order
    pub merged: Value,

    /// Dotted path → the ids that last set it
    pub provenance: ProvenanceMap<Vec<SourceId>>,
}

/// Merge `objects` in order and record, in `ui`, which object each schema
/// field inherits its value from.
///
/// Every path visited while walking `schema` over the merged document that
/// has a provenance record gets a `widget` entry. Other keys of an existing
/// annotation are left alone.
pub fn enrich_schema<'s, O>(
    schema: &'s Value,
    ui: &mut UiAnnotations,
    objects: O,
    options: &EnrichOptions,
) -> Enrichment<'s>
where
    O: IntoIterator<Item = IdentifiedObject>,
{
    let marker = options.delete_marker.as_deref();
    let sources: Vec<_> = objects
        .into_iter()
        .map(|object| object.into_source(marker))
        .collect();
    debug!(sources = sources.len(), "enriching schema");

    let (merged, provenance) = merge_all_with_metadata(&sources, &options.merge).into_parts();

    let mut annotated = 0usize;
    traverse_data(schema, &merged, |ctx| {
        let path = ctx.dotted_path();
        let Some(record) = provenance.get(&path) else {
            return;
        };
        ui.entry(path).or_default().widget = Some(Widget {
            source_ids: record.source_id.clone(),
            inherited_value: record.value.clone(),
        });
        annotated += 1;
    });
    debug!(annotated, "widget annotations written");

    Enrichment {
        schema,
        merged,
        provenance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UiAnnotation;
    use serde_json::json;

    fn ids(ids: &[&str]) -> Vec<SourceId> {
        ids.iter().map(|id| SourceId::from(*id)).collect()
    }

    #[test]
    fn test_annotates_inherited_fields() {
        let schema = json!({
            "type": "object",
            "properties": {"name": {"type": "string"}, "age": {"type": "number"}}
        });
        let objects = vec![
            IdentifiedObject::new(SourceId::from("1"), json!({"name": "Alice", "age": 25})),
            IdentifiedObject::new(SourceId::from("2"), json!({"name": "Bob"})),
            IdentifiedObject::new(SourceId::from("3"), json!({"age": 30})),
        ];
        let mut ui = UiAnnotations::new();
        let result = enrich_schema(&schema, &mut ui, objects, &EnrichOptions::default());

        assert_eq!(result.merged, json!({"name": "Bob", "age": 30}));
        assert!(std::ptr::eq(result.schema, &schema));

        let name = ui["name"].widget.as_ref().unwrap();
        assert_eq!(name.source_ids, ids(&["2"]));
        assert_eq!(name.inherited_value, json!("Bob"));

        let age = ui["age"].widget.as_ref().unwrap();
        assert_eq!(age.source_ids, ids(&["3"]));
        assert_eq!(age.inherited_value, json!(30));
    }

    #[test]
    fn test_existing_annotation_keys_are_kept() {
        let schema = json!({"properties": {"title": {}}});
        let mut ui = UiAnnotations::new();
        let mut title = UiAnnotation::default();
        title.extra.insert("ui:placeholder".to_string(), json!("Untitled"));
        ui.insert("title".to_string(), title);

        let objects = [IdentifiedObject::new(SourceId::from("site"), json!({"title": "Home"}))];
        enrich_schema(&schema, &mut ui, objects, &EnrichOptions::default());

        assert_eq!(
            serde_json::to_value(&ui).unwrap(),
            json!({
                "title": {
                    "widget": {"sourceIds": ["site"], "inheritedValue": "Home"},
                    "ui:placeholder": "Untitled"
                }
            })
        );
    }

    #[test]
    fn test_paths_without_provenance_are_not_annotated() {
        let schema = json!({"properties": {"present": {}, "missing": {}}});
        let objects = [IdentifiedObject::new(SourceId::from("a"), json!({"present": 1, "extra": 2}))];
        let mut ui = UiAnnotations::new();
        let result = enrich_schema(&schema, &mut ui, objects, &EnrichOptions::default());

        assert_eq!(ui.keys().collect::<Vec<_>>(), vec!["present"]);
        // Fields outside the schema still carry provenance.
        assert!(result.provenance.contains_key("extra"));
    }

    #[test]
    fn test_delete_marker_removes_inherited_field() {
        let schema = json!({"properties": {"draft": {}, "title": {}}});
        let objects = [
            IdentifiedObject::new(SourceId::from("base"), json!({"draft": true, "title": "A"})),
            IdentifiedObject::new(SourceId::from("doc"), json!({"draft": "$delete"})),
        ];
        let mut ui = UiAnnotations::new();
        let options = EnrichOptions::default().with_delete_marker("$delete");
        let result = enrich_schema(&schema, &mut ui, objects, &options);

        assert_eq!(result.merged, json!({"title": "A"}));
        assert!(!ui.contains_key("draft"));
        assert_eq!(ui["title"].widget.as_ref().unwrap().source_ids, ids(&["base"]));
    }

    #[test]
    fn test_no_objects() {
        let schema = json!({"properties": {"a": {}}});
        let mut ui = UiAnnotations::new();
        let result = enrich_schema(&schema, &mut ui, Vec::new(), &EnrichOptions::default());
        assert_eq!(result.merged, json!({}));
        assert!(ui.is_empty());
        assert!(result.provenance.is_empty());
    }
}
