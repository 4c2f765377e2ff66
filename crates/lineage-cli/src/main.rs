//! lineage CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use lineage_json::{ArrayStrategy, DEFAULT_DELETE_MARKER, DiffArrayStrategy};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "lineage")]
#[command(version)]
#[command(about = "Merge JSON documents and track where every value came from", long_about = None)]
struct Cli {
    /// String value read as "remove this key" inside input documents
    #[arg(long, global = true, default_value = DEFAULT_DELETE_MARKER)]
    delete_marker: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge JSON documents in order; later files win
    Merge {
        /// JSON documents, identified by their file stem
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// How arrays present on both sides are combined (replace, concat)
        #[arg(long, default_value = "replace")]
        array_strategy: ArrayStrategy,

        /// Also print the path → source provenance map
        #[arg(long)]
        provenance: bool,
    },

    /// Print the overlay that turns BASE into TARGET
    Diff {
        base: PathBuf,

        target: PathBuf,

        /// How differing arrays are recorded (replace, elements)
        #[arg(long, default_value = "replace")]
        diff_strategy: DiffArrayStrategy,
    },

    /// Merge identified objects and annotate a schema with their provenance
    Enrich {
        /// JSON Schema to walk
        #[arg(long)]
        schema: PathBuf,

        /// JSON array of {"id": ..., "data": ...} objects
        #[arg(long)]
        sources: PathBuf,

        /// Existing UI annotations to update
        #[arg(long)]
        ui: Option<PathBuf>,

        /// How arrays present on both sides are combined (replace, concat)
        #[arg(long, default_value = "replace")]
        array_strategy: ArrayStrategy,
    },

    /// Print every node visited while walking a schema
    Walk {
        /// JSON Schema to walk
        #[arg(long)]
        schema: PathBuf,

        /// Data to walk alongside the schema
        #[arg(long)]
        data: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the JSON output.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lineage=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let delete_marker = cli.delete_marker;

    match cli.command {
        Commands::Merge {
            files,
            array_strategy,
            provenance,
        } => commands::merge::execute(commands::merge::MergeArgs {
            files,
            array_strategy,
            provenance,
            delete_marker,
        }),
        Commands::Diff {
            base,
            target,
            diff_strategy,
        } => commands::diff::execute(commands::diff::DiffArgs {
            base,
            target,
            diff_strategy,
            delete_marker,
        }),
        Commands::Enrich {
            schema,
            sources,
            ui,
            array_strategy,
        } => commands::enrich::execute(commands::enrich::EnrichArgs {
            schema,
            sources,
            ui,
            array_strategy,
            delete_marker,
        }),
        Commands::Walk { schema, data } => {
            commands::walk::execute(commands::walk::WalkArgs { schema, data })
        }
    }
}
