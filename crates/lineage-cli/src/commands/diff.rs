//! Diff command implementation

use std::path::PathBuf;

use anyhow::Result;
use lineage_json::{DiffArrayStrategy, DiffOptions, diff};
use serde_json::Value;
use tracing::info;

use super::{print_json, read_json};

/// Arguments for the diff command
#[derive(Debug)]
pub struct DiffArgs {
    pub base: PathBuf,
    pub target: PathBuf,
    pub diff_strategy: DiffArrayStrategy,
    /// Spelling of removed keys in the printed overlay
    pub delete_marker: String,
}

pub fn execute(args: DiffArgs) -> Result<()> {
    let output = run(&args)?;
    print_json(&output)
}

fn run(args: &DiffArgs) -> Result<Value> {
    let base = read_json(&args.base)?;
    let target = read_json(&args.target)?;

    let options = DiffOptions::default().with_array_strategy(args.diff_strategy);
    let overlay = diff(&base, &target, &options);
    info!(changed = !overlay.is_empty(), "computed overlay");

    Ok(overlay.to_value_with_marker(&args.delete_marker))
}
