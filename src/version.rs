use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// On-disk version record: a JSON document with a single `version` key.
#[derive(Debug, Serialize, Deserialize)]
struct VersionFile {
    version: String,
}

/// A dotted sequence of non-negative integers, e.g. `0.4.12`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version(Vec<u64>);

impl FromStr for Version {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .split('.')
            .map(|part| {
                part.parse::<u64>()
                    .with_context(|| format!("invalid version component {:?} in {:?}", part, s))
            })
            .collect::<Result<Vec<u64>>>()?;
        Ok(Self(parts))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

impl Version {
    /// Increment only the final component; major and minor bumps are
    /// explicit-version operations.
    pub fn bump_last(&self) -> Version {
        let mut parts = self.0.clone();
        if let Some(last) = parts.last_mut() {
            *last += 1;
        }
        Version(parts)
    }
}

/// What the caller asked the resolver to do with the version file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRequest {
    /// Bump the last component of the stored version.
    Auto,
    /// Store this exact string, verbatim.
    Explicit(String),
    /// Leave the version file alone.
    Skip,
}

impl VersionRequest {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "auto" => VersionRequest::Auto,
            "" => VersionRequest::Skip,
            other => VersionRequest::Explicit(other.to_string()),
        }
    }
}

pub async fn read_version(path: &Path) -> Result<Version> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let record: VersionFile = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    record
        .version
        .parse()
        .with_context(|| format!("stored version {:?} is malformed", record.version))
}

pub async fn write_version(path: &Path, version: &str) -> Result<()> {
    let payload = serde_json::to_string(&VersionFile {
        version: version.to_string(),
    })?;
    tokio::fs::write(path, payload)
        .await
        .with_context(|| format!("failed to write {}", path.display()))
}

/// Resolve the version to embed in the next build and persist it, unless the
/// request is `Skip` or this is a dry run.
pub async fn resolve_version(
    path: &Path,
    request: &VersionRequest,
    dry_run: bool,
) -> Result<Option<String>> {
    let resolved = match request {
        VersionRequest::Skip => return Ok(None),
        VersionRequest::Explicit(v) => v.clone(),
        VersionRequest::Auto => read_version(path).await?.bump_last().to_string(),
    };
    if dry_run {
        tracing::debug!("version: dry-run, not writing {}", path.display());
    } else {
        write_version(path, &resolved).await?;
    }
    Ok(Some(resolved))
}
