//! Workspace maintenance tasks: `cargo run -p scenebook-xtask -- <task>`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use scenebook::document::network;
use scenebook::options::Options;

#[derive(Parser)]
#[command(name = "xtask")]
struct Cli {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Write the options JSON Schema.
    Schema {
        /// Destination file.
        #[arg(default_value = "docs/options.schema.json")]
        out: PathBuf,
    },
    /// Fail if any embedded asset references the network.
    CheckAssets,
}

fn write_schema(out: &Path) -> Result<()> {
    let schema = serde_json::to_string_pretty(&Options::json_schema())?;
    if let Some(dir) = out.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    std::fs::write(out, schema + "\n")
        .with_context(|| format!("writing {}", out.display()))?;
    Ok(())
}

fn check_assets() -> Result<()> {
    let mut offending = Vec::new();
    for name in scenebook::assets::names() {
        let text = scenebook::assets::text(&name)?;
        for url in network::external_references(&text) {
            offending.push(format!("{name}: {url}"));
        }
    }
    if !offending.is_empty() {
        bail!("assets reference the network:\n  {}", offending.join("\n  "));
    }
    Ok(())
}

fn main() -> Result<()> {
    match Cli::parse().task {
        Task::Schema { out } => write_schema(&out),
        Task::CheckAssets => check_assets(),
    }
}
