//! Walk command implementation

use std::path::PathBuf;

use anyhow::Result;
use lineage_schema::{DataSlot, TraversalContext, traverse_data, traverse_schema};
use serde_json::Value;
use tracing::info;

use super::read_json;

/// Arguments for the walk command
#[derive(Debug)]
pub struct WalkArgs {
    pub schema: PathBuf,
    pub data: Option<PathBuf>,
}

pub fn execute(args: WalkArgs) -> Result<()> {
    let schema = read_json(&args.schema)?;
    let data = args.data.as_deref().map(read_json).transpose()?;

    let lines = walk_lines(&schema, data.as_ref());
    info!(visited = lines.len(), "walked schema");
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

/// One tab separated line per visit: path, property name, data.
fn walk_lines(schema: &Value, data: Option<&Value>) -> Vec<String> {
    let mut lines = Vec::new();
    let mut record = |ctx: &TraversalContext<'_>| lines.push(describe(ctx));
    match data {
        Some(data) => traverse_data(schema, data, &mut record),
        None => traverse_schema(schema, &mut record),
    }
    lines
}

fn describe(ctx: &TraversalContext<'_>) -> String {
    let path = if ctx.path.is_empty() {
        "$".to_string()
    } else {
        format!("$.{}", ctx.dotted_path())
    };
    let data = match ctx.data {
        DataSlot::Unbound => "-".to_string(),
        DataSlot::Missing => "<missing>".to_string(),
        DataSlot::Present(value) => value.to_string(),
    };
    format!("{path}\t{}\t{data}", ctx.property_name.unwrap_or("-"))
}
