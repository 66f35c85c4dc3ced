use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use sharpcov::{cli, ingest, model::Assembly};

/// sharpcov — SharpCover trace ingestion into a hierarchical coverage model.
#[derive(Parser)]
#[command(name = "sharpcov", version, about)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show overall totals for a trace.
    Summary {
        /// Path to the SharpCover trace file.
        file: PathBuf,
    },

    /// List classes with their coverage quota.
    Classes {
        /// Path to the SharpCover trace file.
        file: PathBuf,
    },

    /// List source files with line coverage counts.
    Files {
        /// Path to the SharpCover trace file.
        file: PathBuf,
    },

    /// Show per-test-method coverage for one source file.
    Methods {
        /// Path to the SharpCover trace file.
        file: PathBuf,

        /// Source file path as it appears in the trace.
        #[arg(long)]
        source: String,
    },

    /// Dump the full coverage model as JSON.
    Json {
        /// Path to the SharpCover trace file.
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let output = match args.command {
        Commands::Summary { file } => cli::cmd_summary(&load(&file)?)?,
        Commands::Classes { file } => cli::cmd_classes(&load(&file)?)?,
        Commands::Files { file } => cli::cmd_files(&load(&file)?)?,
        Commands::Methods { file, source } => cli::cmd_methods(&load(&file)?, &source)?,
        Commands::Json { file } => cli::cmd_json(&load(&file)?)?,
    };
    print!("{output}");
    Ok(())
}

fn load(path: &Path) -> Result<Vec<Assembly>> {
    ingest::ingest(path).with_context(|| format!("Failed to ingest trace {}", path.display()))
}
