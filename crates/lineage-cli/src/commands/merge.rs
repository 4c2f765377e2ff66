//! Merge command implementation

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lineage_json::{ArrayStrategy, MergeOptions, Patch};
use lineage_merge::{Source, merge_all_with_metadata};
use serde_json::{Value, json};
use tracing::info;

use super::{print_json, read_json};

/// Arguments for the merge command
#[derive(Debug)]
pub struct MergeArgs {
    pub files: Vec<PathBuf>,
    pub array_strategy: ArrayStrategy,
    /// Print `{merged, provenance}` instead of the bare document
    pub provenance: bool,
    pub delete_marker: String,
}

pub fn execute(args: MergeArgs) -> Result<()> {
    let output = run(&args)?;
    print_json(&output)
}

fn run(args: &MergeArgs) -> Result<Value> {
    let mut sources = Vec::with_capacity(args.files.len());
    for file in &args.files {
        let value = read_json(file)?;
        sources.push(Source::new(
            source_id(file),
            Patch::from_value_with_marker(value, &args.delete_marker),
        ));
    }

    let options = MergeOptions::default().with_array_strategy(args.array_strategy);
    let merged = merge_all_with_metadata(&sources, &options);
    info!(
        documents = sources.len(),
        paths = merged.provenance().len(),
        "merged documents"
    );

    let (value, provenance) = merged.into_parts();
    if !args.provenance {
        return Ok(value);
    }
    let provenance = serde_json::to_value(provenance).context("Failed to serialize provenance")?;
    Ok(json!({"merged": value, "provenance": provenance}))
}

/// A document is identified by its file stem.
fn source_id(path: &Path) -> String {
    path.file_stem().map_or_else(
        || path.display().to_string(),
        |stem| stem.to_string_lossy().into_owned(),
    )
}
