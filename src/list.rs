use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::config::Settings;

/// Package-index project document, reduced to the fields the listing needs.
#[derive(Debug, Deserialize)]
pub(crate) struct ProjectDocument {
    #[serde(default)]
    releases: IndexMap<String, Vec<ReleaseArtifact>>,
}

#[derive(Debug, Deserialize)]
struct ReleaseArtifact {
    packagetype: Option<String>,
    upload_time: Option<String>,
}

/// List all releases published on the package index.
pub async fn run_list(settings: &Settings) -> Result<()> {
    let package = settings.package()?;
    let output = fetch_and_render(&settings.index_url, package).await?;
    print!("{}", output);
    Ok(())
}

pub(crate) async fn fetch_and_render(index_url: &str, package: &str) -> Result<String> {
    let url = format!("{}/{}/json", index_url.trim_end_matches('/'), package);
    tracing::debug!("list: querying {}", url);
    let client = reqwest::Client::builder()
        .user_agent(concat!("pyship/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build HTTP client")?;

    // An unreachable index or an unknown package is an expected outcome for
    // an unpublished project, not a failure.
    let response = match client.get(&url).send().await {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!("list: query failed: {}", err);
            return Ok(not_found(package));
        }
    };
    if !response.status().is_success() {
        tracing::debug!("list: index returned status {}", response.status());
        return Ok(not_found(package));
    }

    let doc: ProjectDocument = response
        .json()
        .await
        .context("failed to parse package index response")?;
    Ok(render_releases(package, &doc))
}

fn not_found(package: &str) -> String {
    format!("Package \"{}\" not found on PyPI\n", package)
}

/// One line per version: the version, the upload time of the last artifact
/// scanned, and the artifact format labels joined in order of appearance.
pub(crate) fn render_releases(package: &str, doc: &ProjectDocument) -> String {
    if doc.releases.is_empty() {
        return format!("No releases found for {}\n", package);
    }
    let mut out = String::new();
    for (version, artifacts) in &doc.releases {
        let mut formats: Vec<&str> = Vec::new();
        let mut published_on = "";
        for artifact in artifacts {
            if let Some(kind) = &artifact.packagetype {
                formats.push(kind.as_str());
            }
            if let Some(ts) = &artifact.upload_time {
                published_on = ts.as_str();
            }
        }
        out.push_str(&format!(
            "{:<10}{:>15}{:>25}\n",
            version,
            published_on,
            formats.join(" | ")
        ));
    }
    out
}
