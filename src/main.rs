//! `scenebook` command line: scene files and structure files to
//! self-contained HTML.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use scenebook::chem::io::{self, Loaded};
use scenebook::document::RenderLibrary;
use scenebook::prelude::{AssemblyContext, MolGrid, Options, SceneError};
use scenebook::scene::file::SceneFile;

#[derive(Parser)]
#[command(name = "scenebook", version, about)]
struct Cli {
    /// Options TOML (viewer, ui and grid defaults).
    #[arg(long, global = true)]
    options: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a scene file into one HTML document.
    Scene {
        /// Scene description (TOML).
        scene: PathBuf,
        /// Local copy of the rendering library.
        #[arg(long)]
        library: PathBuf,
        /// Output file; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render a structure file as a selectable molecule grid (one row per
    /// SDF record, or per PDB component).
    Grid {
        /// Structure file with one or more molecules.
        input: PathBuf,
        /// Output file; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Fixed grid id instead of a random one.
        #[arg(long)]
        id: Option<String>,
    },
    /// Print the options JSON Schema.
    Schema,
}

fn emit(html: &str, output: Option<&Path>) -> Result<(), SceneError> {
    match output {
        Some(path) => {
            std::fs::write(path, html)?;
            log::info!("wrote {}", path.display());
        }
        None => std::io::stdout().lock().write_all(html.as_bytes())?,
    }
    Ok(())
}

fn render_scene(
    scene: &Path,
    library: &Path,
    output: Option<&Path>,
    options: Options,
) -> Result<(), SceneError> {
    let file = SceneFile::load(scene)?;
    let base = scene.parent().unwrap_or_else(|| Path::new("."));
    let mut builder = file.build(base)?;
    let library = RenderLibrary::from_path(library)?;
    let ctx = AssemblyContext::new(&library).with_options(options);
    let artifact = builder.render(&ctx)?;
    for warning in artifact.warnings() {
        log::warn!("{warning}");
    }
    emit(artifact.html(), output)
}

fn render_grid(
    input: &Path,
    output: Option<&Path>,
    id: Option<&str>,
    options: Options,
) -> Result<(), SceneError> {
    let molecules = match io::load(input)? {
        Loaded::Molecules(molecules) => molecules,
        Loaded::Complex(complex) => {
            complex.components.into_iter().map(|c| c.molecule).collect()
        }
    };
    let mut grid = MolGrid::from_molecules(&molecules).with_options(options.grid);
    if let Some(id) = id {
        grid = grid.with_id(id);
    }
    emit(&grid.to_html()?, output)
}

fn run(cli: Cli) -> Result<(), SceneError> {
    let options = match &cli.options {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    match cli.command {
        Command::Scene {
            scene,
            library,
            output,
        } => render_scene(&scene, &library, output.as_deref(), options),
        Command::Grid { input, output, id } => {
            render_grid(&input, output.as_deref(), id.as_deref(), options)
        }
        Command::Schema => {
            let schema = serde_json::to_string_pretty(&Options::json_schema())?;
            emit(&format!("{schema}\n"), None)
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
