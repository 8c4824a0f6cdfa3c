use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;

/// List the artifact files currently in the dist directory, sorted by path.
/// A missing directory is treated as empty.
pub async fn artifact_files(dist_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = match fs::read_dir(dist_dir).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", dist_dir.display()));
        }
    };
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// True when the dist directory is missing or has no entries at all.
pub async fn is_empty(dist_dir: &Path) -> Result<bool> {
    let mut entries = match fs::read_dir(dist_dir).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(true),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", dist_dir.display()));
        }
    };
    Ok(entries.next_entry().await?.is_none())
}

/// Clear the dist directory. The directory is renamed aside first so
/// concurrent observers never see a half-deleted tree, then the renamed copy
/// is removed and the directory recreated empty.
pub async fn clear(dist_dir: &Path) -> Result<()> {
    let name = dist_dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("invalid dist directory: {}", dist_dir.display()))?;
    let doomed = dist_dir.with_file_name(format!("{}_delete", name));
    fs::rename(dist_dir, &doomed)
        .await
        .with_context(|| format!("failed to move {} aside", dist_dir.display()))?;
    fs::remove_dir_all(&doomed)
        .await
        .with_context(|| format!("failed to delete {}", doomed.display()))?;
    fs::create_dir(dist_dir)
        .await
        .with_context(|| format!("failed to recreate {}", dist_dir.display()))?;
    tracing::debug!("dist: cleared {}", dist_dir.display());
    Ok(())
}

/// Ask the operator whether the dist directory may be cleared. EOF counts as
/// a decline.
pub async fn confirm_clear(dist_dir: &Path) -> Result<bool> {
    print!(
        "{} is not empty - delete contents? [y/N] ",
        dist_dir.display()
    );
    std::io::stdout().flush().context("failed to flush stdout")?;
    tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        let read = std::io::stdin()
            .read_line(&mut line)
            .context("failed to read confirmation")?;
        if read == 0 {
            return Ok(false);
        }
        let answer = line.trim();
        Ok::<_, anyhow::Error>(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    })
    .await
    .map_err(|e| anyhow::anyhow!("confirm task join error: {}", e))?
}
