use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs as async_fs;

use crate::common::error::BulkerError;
use crate::common::result::BulkerResult;
use crate::domain::value_objects::{OutputFormat, RunMode};

/// Default file name of the global configuration file
pub const CONFIG_FILE: &str = "config.yaml";

/// Global defaults read from the configuration file; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputFormat>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<RunMode>,

    /// Path of the settings file holding repositories and groups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<PathBuf>,

    /// Directory the repositories are cloned into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<bool>,
}

/// Loads [`ConfigFile`] from disk
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file yields all-default values
    pub async fn load(&self) -> BulkerResult<ConfigFile> {
        if !async_fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(ConfigFile::default());
        }

        let content = async_fs::read_to_string(&self.path).await.map_err(|e| {
            BulkerError::filesystem_error_with_source(
                "failed to read config",
                Some(self.path.clone()),
                e,
            )
        })?;

        if content.trim().is_empty() {
            return Ok(ConfigFile::default());
        }

        serde_yaml::from_str(&content).map_err(|e| {
            BulkerError::config_error_with_source(
                format!("invalid config file {}", self.path.display()),
                e,
            )
        })
    }
}
