mod build;
mod check;
mod config;
mod dist;
mod list;
mod upload;
mod version;

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::build::BuildOptions;
use crate::upload::{Credentials, UploadOptions};
use crate::version::VersionRequest;

#[derive(Parser, Debug)]
#[command(name = "pyship", version, about = "PyPI release helper", long_about = None)]
struct Cli {
    /// Print planned actions without running external tools or touching files
    #[arg(global = true, long = "dry-run", default_value_t = false)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the distribution artifacts: wheel and source archive
    Build(BuildArgs),
    /// Upload distribution artifacts to PyPI or test.pypi
    Upload(UploadArgs),
    /// Check packaging metadata of the built artifacts
    Check,
    /// List releases published on the package index
    List,
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Clear a non-empty dist directory without asking
    #[arg(long, overrides_with = "_no_force")]
    force: bool,
    /// Ask before clearing a non-empty dist directory (default)
    #[arg(long = "no-force")]
    _no_force: bool,
    /// Version to embed in the build, or "auto" to bump the last component
    #[arg(long, default_value = "auto")]
    version: String,
}

#[derive(Args, Debug)]
struct UploadArgs {
    /// Upload to PyPI instead of test.pypi
    #[arg(long, overrides_with = "_no_release")]
    release: bool,
    /// Upload to test.pypi (default)
    #[arg(long = "no-release")]
    _no_release: bool,
    /// Rebuild the distribution artifacts before uploading (default)
    #[arg(long = "rebuild", overrides_with = "no_rebuild")]
    _rebuild: bool,
    /// Upload whatever the dist directory already contains
    #[arg(long)]
    no_rebuild: bool,
    /// Version to embed in the rebuild, or "auto" to bump the last component
    #[arg(long, default_value = "auto")]
    version: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let settings = config::load_settings(Path::new("."))
        .await
        .context("failed to load configuration")?;

    match cli.command {
        Commands::Build(args) => {
            let opts = BuildOptions {
                force: args.force,
                version: VersionRequest::parse(&args.version),
            };
            build::run_build(&settings, &opts, cli.dry_run).await?;
        }
        Commands::Upload(args) => {
            let opts = UploadOptions {
                release: args.release,
                rebuild: !args.no_rebuild,
                version: VersionRequest::parse(&args.version),
            };
            let creds = Credentials::from_env();
            upload::run_upload(&settings, &opts, &creds, cli.dry_run).await?;
        }
        Commands::Check => check::run_check(&settings, cli.dry_run).await?,
        Commands::List => list::run_list(&settings).await?,
    }

    Ok(())
}

fn init_tracing() {
    // Keep stdout for command output; diagnostics go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
