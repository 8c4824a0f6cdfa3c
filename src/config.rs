use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

const CONFIG_FILE_NAME: &str = ".pyship.toml";

const DEFAULT_DIST_DIR: &str = "dist";
const DEFAULT_VERSION_FILE: &str = "version.json";
const DEFAULT_INDEX_URL: &str = "https://pypi.org/pypi";
const DEFAULT_STAGING_REPOSITORY_URL: &str = "https://test.pypi.org/legacy/";
const DEFAULT_PYTHON_BIN: &str = "python";
const DEFAULT_TWINE_BIN: &str = "twine";

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub package: Option<String>,
    pub dist_dir: Option<PathBuf>,
    pub version_file: Option<PathBuf>,
    pub index_url: Option<String>,
    pub staging_repository_url: Option<String>,
    pub python_bin: Option<String>,
    pub twine_bin: Option<String>,
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub package: Option<String>,
    pub dist_dir: PathBuf,
    pub version_file: PathBuf,
    pub index_url: String,
    pub staging_repository_url: String,
    pub python_bin: String,
    pub twine_bin: String,
}

impl Settings {
    /// Package name on the index; only the `list` command needs one.
    pub fn package(&self) -> Result<&str> {
        match self.package.as_deref() {
            Some(name) => Ok(name),
            None => bail!(
                "no package name configured; set `package` in {}",
                CONFIG_FILE_NAME
            ),
        }
    }
}

pub async fn load_file_config(root: &Path) -> Result<FileConfig> {
    let path = root.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let content = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let cfg: FileConfig =
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(cfg)
}

pub async fn load_settings(root: &Path) -> Result<Settings> {
    let cfg = load_file_config(root).await?;
    Ok(Settings {
        package: cfg.package,
        dist_dir: cfg
            .dist_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIST_DIR)),
        version_file: cfg
            .version_file
            .unwrap_or_else(|| PathBuf::from(DEFAULT_VERSION_FILE)),
        index_url: cfg.index_url.unwrap_or_else(|| DEFAULT_INDEX_URL.into()),
        staging_repository_url: cfg
            .staging_repository_url
            .unwrap_or_else(|| DEFAULT_STAGING_REPOSITORY_URL.into()),
        python_bin: cfg.python_bin.unwrap_or_else(|| DEFAULT_PYTHON_BIN.into()),
        twine_bin: cfg.twine_bin.unwrap_or_else(|| DEFAULT_TWINE_BIN.into()),
    })
}
