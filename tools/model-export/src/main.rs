//! model-export - configurable vertex layout model exporter
//!
//! Converts glTF/GLB/OBJ scenes to self-describing .nmodel files: a header
//! block with the vertex layout, an interleaved vertex buffer and a flat u32
//! index buffer.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

// Use modules from library
use model_export::{formats, manifest, mesh, VertexLayout};

#[derive(Parser)]
#[command(name = "model-export")]
#[command(about = "Configurable vertex layout model exporter")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
#[command(
    after_help = "A source path that matches a subcommand name must follow `--`, \
                  e.g. `model-export -- build out.nmodel`."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    convert: ConvertArgs,
}

#[derive(Args)]
struct ConvertArgs {
    /// SOURCE (glTF/GLB/OBJ) and DESTINATION (.nmodel); any other count does nothing
    #[arg(value_name = "PATH", num_args = 0..)]
    paths: Vec<PathBuf>,

    /// Vertex layout, in order (e.g. position,normal,uv); auto-detected when omitted
    #[arg(short, long)]
    layout: Option<VertexLayout>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single scene file
    Convert {
        /// Input scene file (glTF/GLB/OBJ)
        source: PathBuf,

        /// Output .nmodel file
        destination: PathBuf,

        /// Vertex layout, in order (e.g. position,normal,uv)
        #[arg(short, long)]
        layout: Option<VertexLayout>,
    },

    /// Print the header and vertex layout of a .nmodel file
    Inspect {
        /// Model file to inspect
        file: PathBuf,
    },

    /// Build models from a manifest file
    Build {
        /// Path to models.toml manifest
        #[arg(default_value = "models.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate manifest without building
    Check {
        /// Path to models.toml manifest
        #[arg(default_value = "models.toml")]
        manifest: PathBuf,
    },
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let command = match cli.command {
        Some(command) => command,
        None => {
            let ConvertArgs { paths, layout } = cli.convert;
            // Only SOURCE DESTINATION converts; any other count does nothing
            let [source, destination]: [PathBuf; 2] = match paths.try_into() {
                Ok(pair) => pair,
                Err(paths) => {
                    if !paths.is_empty() {
                        tracing::warn!(
                            "Expected SOURCE and DESTINATION, got {} paths, nothing to do",
                            paths.len()
                        );
                    }
                    return Ok(());
                }
            };
            Commands::Convert {
                source,
                destination,
                layout,
            }
        }
    };

    match command {
        Commands::Convert {
            source,
            destination,
            layout,
        } => {
            tracing::info!("Converting {:?} -> {:?}", source, destination);
            mesh::convert(&source, &destination, layout.as_ref())?;
            tracing::info!("Done!");
        }

        Commands::Inspect { file } => {
            formats::inspect_model(&file)?;
        }

        Commands::Build { manifest, output } => {
            tracing::info!("Building models from {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            let count = manifest::build_all(&config, output.as_deref())?;
            tracing::info!("Build complete! {} models written", count);
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }
    }

    Ok(())
}
