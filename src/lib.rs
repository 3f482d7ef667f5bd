pub mod commands;
pub mod core;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::GenerateRequest;
use crate::core::catalog::CatalogSource;
use crate::core::loaders::LoaderKind;
use crate::core::state::AppState;
use crate::core::template::ModIdentity;

/// Universal mod template generator
#[derive(Parser)]
#[command(name = "modgen")]
#[command(about = "Loader compatibility matrix and mod template generator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// List Minecraft releases, newest first
    Versions,

    /// Show every loader's version map
    Loaders,

    /// Show the compatibility matrix
    Compatible,

    /// Refetch upstream feeds
    Refresh {
        /// Only this source: game-versions, fabric, fabricApi, forge or neoforge
        #[arg(long, value_parser = parse_catalog_source)]
        source: Option<CatalogSource>,
    },

    /// Download the cached upstream template archive
    Template {
        /// File the archive is written to
        #[arg(long, default_value = "template.zip")]
        out: PathBuf,
    },

    /// Generate a customized template archive
    Generate {
        #[arg(long)]
        mod_id: String,

        #[arg(long)]
        mod_name: String,

        #[arg(long)]
        package_name: String,

        /// Loader to build for (repeatable)
        #[arg(long = "loader", required = true, value_parser = parse_loader_kind)]
        loaders: Vec<LoaderKind>,

        /// Minecraft version id (repeatable, first one is the primary)
        #[arg(long = "mc-version", required = true)]
        versions: Vec<String>,

        /// Local template zip instead of the upstream download
        #[arg(long)]
        template: Option<PathBuf>,

        /// Directory the artifact is written to
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

fn parse_loader_kind(value: &str) -> Result<LoaderKind, String> {
    LoaderKind::ALL
        .into_iter()
        .find(|kind| kind.as_str().eq_ignore_ascii_case(value))
        .ok_or_else(|| format!("unknown loader '{}'", value))
}

fn parse_catalog_source(value: &str) -> Result<CatalogSource, String> {
    if value.eq_ignore_ascii_case("game-versions") {
        return Ok(CatalogSource::GameVersions);
    }
    parse_loader_kind(value).map(CatalogSource::Loader)
}

/// Structured logging to stderr so command output stays machine-readable.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,modgen_lib=debug")),
        )
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> Result<()> {
    // Load .env file if it exists (for MODGEN_DATA_DIR and RUST_LOG)
    let _ = dotenvy::dotenv();
    init_logging();

    let cli = Cli::parse();
    tracing::info!("Universal mod template generator starting...");

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(execute(cli.command))
}

async fn execute(command: Command) -> Result<()> {
    let state = AppState::new().context("Failed to initialize generator state")?;

    match command {
        Command::Versions => print_json(&commands::get_minecraft_versions(&state).await?),
        Command::Loaders => print_json(&commands::get_mod_loader_versions(&state).await?),
        Command::Compatible => print_json(&commands::get_compatible_versions(&state).await?),
        Command::Refresh { source } => {
            print_json(&commands::refresh_catalog(&state, source).await?)
        }
        Command::Template { out } => {
            let bytes = commands::get_template(&state).await?;
            tokio::fs::write(&out, bytes.as_slice())
                .await
                .with_context(|| format!("Failed to write {:?}", out))?;
            println!("{}", out.display());
            Ok(())
        }
        Command::Generate {
            mod_id,
            mod_name,
            package_name,
            loaders,
            versions,
            template,
            out,
        } => {
            let template = match template {
                Some(path) => Some(
                    tokio::fs::read(&path)
                        .await
                        .with_context(|| format!("Failed to read template {:?}", path))?,
                ),
                None => None,
            };

            let request = GenerateRequest {
                identity: ModIdentity {
                    mod_id,
                    mod_name,
                    package_name,
                },
                loaders,
                versions,
            };
            let artifact = commands::generate_template(&state, request, template).await?;

            tokio::fs::create_dir_all(&out)
                .await
                .with_context(|| format!("Failed to create {:?}", out))?;
            let path = out.join(&artifact.file_name);
            tokio::fs::write(&path, &artifact.bytes)
                .await
                .with_context(|| format!("Failed to write {:?}", path))?;

            println!("{}", path.display());
            Ok(())
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
