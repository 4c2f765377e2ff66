//! Enrich command implementation

use std::path::PathBuf;

use anyhow::{Context, Result};
use lineage_annotate::{EnrichOptions, IdentifiedObject, UiAnnotations, enrich_schema};
use lineage_json::{ArrayStrategy, MergeOptions};
use serde_json::{Value, json};
use tracing::info;

use super::{print_json, read_json};

/// Arguments for the enrich command
#[derive(Debug)]
pub struct EnrichArgs {
    pub schema: PathBuf,
    /// JSON array of identified objects
    pub sources: PathBuf,
    /// Annotations to start from
    pub ui: Option<PathBuf>,
    pub array_strategy: ArrayStrategy,
    pub delete_marker: String,
}

pub fn execute(args: EnrichArgs) -> Result<()> {
    let output = run(&args)?;
    print_json(&output)
}

fn run(args: &EnrichArgs) -> Result<Value> {
    let schema = read_json(&args.schema)?;
    let objects: Vec<IdentifiedObject> = serde_json::from_value(read_json(&args.sources)?)
        .with_context(|| {
            format!(
                "{} must be an array of {{\"id\", \"data\"}} objects",
                args.sources.display()
            )
        })?;
    let mut ui: UiAnnotations = match &args.ui {
        Some(path) => serde_json::from_value(read_json(path)?)
            .with_context(|| format!("{} is not a UI annotation map", path.display()))?,
        None => UiAnnotations::new(),
    };

    let options = EnrichOptions {
        merge: MergeOptions::default().with_array_strategy(args.array_strategy),
        delete_marker: Some(args.delete_marker.clone()),
    };
    let count = objects.len();
    let result = enrich_schema(&schema, &mut ui, objects, &options);
    info!(objects = count, annotations = ui.len(), "enriched schema");

    let ui = serde_json::to_value(&ui).context("Failed to serialize UI annotations")?;
    Ok(json!({"merged": result.merged, "uiSchema": ui}))
}
