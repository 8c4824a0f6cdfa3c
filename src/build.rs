use anyhow::{Context, Result, bail};
use tokio::process::Command;

use crate::config::Settings;
use crate::dist;
use crate::version::{self, VersionRequest};

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub force: bool,
    pub version: VersionRequest,
}

/// Build the distribution artifacts: a wheel and a gzipped source archive.
pub async fn run_build(settings: &Settings, opts: &BuildOptions, dry_run: bool) -> Result<()> {
    if dry_run {
        let existing = dist::artifact_files(&settings.dist_dir).await?;
        let resolved =
            version::resolve_version(&settings.version_file, &opts.version, true).await?;
        println!(
            "build: dry-run (version={} dist={} existing_files={})",
            resolved.as_deref().unwrap_or("<unchanged>"),
            settings.dist_dir.display(),
            existing.len()
        );
        return Ok(());
    }

    prepare_dist_dir(settings, opts.force).await?;

    if let Some(resolved) =
        version::resolve_version(&settings.version_file, &opts.version, false).await?
    {
        tracing::info!("build: version resolved to {}", resolved);
    }

    run_build_tool(settings, &["setup.py", "bdist_wheel"]).await?;
    run_build_tool(settings, &["setup.py", "sdist", "--formats=gztar"]).await?;
    Ok(())
}

async fn prepare_dist_dir(settings: &Settings, force: bool) -> Result<()> {
    if dist::is_empty(&settings.dist_dir).await? {
        return Ok(());
    }
    if !force && !dist::confirm_clear(&settings.dist_dir).await? {
        bail!("aborting: {} is not empty", settings.dist_dir.display());
    }
    dist::clear(&settings.dist_dir).await
}

async fn run_build_tool(settings: &Settings, args: &[&str]) -> Result<()> {
    tracing::info!("build: running {} {}", settings.python_bin, args.join(" "));
    let status = Command::new(&settings.python_bin)
        .args(args)
        .status()
        .await
        .with_context(|| format!("failed to spawn {}", settings.python_bin))?;
    if !status.success() {
        bail!(
            "{} {} failed with status: {}",
            settings.python_bin,
            args.join(" "),
            status
        );
    }
    Ok(())
}
