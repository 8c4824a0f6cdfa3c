use anyhow::{Context, Result, bail};
use tokio::process::Command;

use crate::config::Settings;
use crate::dist;

/// Validate packaging metadata of the built artifacts.
pub async fn run_check(settings: &Settings, dry_run: bool) -> Result<()> {
    if dist::is_empty(&settings.dist_dir).await? {
        println!("No distribution files found. Please run 'build' command first");
        return Ok(());
    }
    let files = dist::artifact_files(&settings.dist_dir).await?;

    if dry_run {
        println!("check: dry-run (files={})", files.len());
        return Ok(());
    }

    tracing::info!("check: validating {} files", files.len());
    let status = Command::new(&settings.twine_bin)
        .arg("check")
        .args(&files)
        .status()
        .await
        .with_context(|| format!("failed to spawn {}", settings.twine_bin))?;
    if !status.success() {
        bail!("{} check failed with status: {}", settings.twine_bin, status);
    }
    Ok(())
}
