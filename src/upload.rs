use anyhow::{Context, Result, bail};
use tokio::process::Command;

use crate::build::{self, BuildOptions};
use crate::config::Settings;
use crate::dist;
use crate::version::VersionRequest;

#[derive(Debug, Clone)]
pub struct UploadOptions {
    pub release: bool,
    pub rebuild: bool,
    pub version: VersionRequest,
}

/// Credentials for the upload tool. Read once from the environment and passed
/// to the subprocess explicitly so the upload's dependencies stay enumerable.
#[derive(Debug, Default, Clone)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            username: non_empty_var("TWINE_USERNAME"),
            password: non_empty_var("TWINE_PASSWORD"),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Publish the distribution artifacts to PyPI or test.pypi.
pub async fn run_upload(
    settings: &Settings,
    opts: &UploadOptions,
    creds: &Credentials,
    dry_run: bool,
) -> Result<()> {
    if opts.rebuild {
        let build_opts = BuildOptions {
            force: true,
            version: opts.version.clone(),
        };
        build::run_build(settings, &build_opts, dry_run).await?;
    } else if dist::is_empty(&settings.dist_dir).await? {
        println!("No distribution files found. Please run 'build' command first");
        return Ok(());
    }

    let files = dist::artifact_files(&settings.dist_dir).await?;

    if dry_run {
        let repository = if opts.release {
            "pypi"
        } else {
            settings.staging_repository_url.as_str()
        };
        println!(
            "upload: dry-run (repository={} files={})",
            repository,
            files.len()
        );
        return Ok(());
    }

    if files.is_empty() {
        bail!(
            "build produced no distribution files in {}",
            settings.dist_dir.display()
        );
    }

    tracing::info!(
        "upload: publishing {} files (release={})",
        files.len(),
        opts.release
    );
    let mut cmd = Command::new(&settings.twine_bin);
    cmd.arg("upload");
    if !opts.release {
        cmd.arg("--repository-url").arg(&settings.staging_repository_url);
    }
    cmd.args(&files);
    if let Some(username) = &creds.username {
        cmd.env("TWINE_USERNAME", username);
    }
    if let Some(password) = &creds.password {
        cmd.env("TWINE_PASSWORD", password);
    }
    let status = cmd
        .status()
        .await
        .with_context(|| format!("failed to spawn {}", settings.twine_bin))?;
    if !status.success() {
        bail!("{} upload failed with status: {}", settings.twine_bin, status);
    }
    Ok(())
}
