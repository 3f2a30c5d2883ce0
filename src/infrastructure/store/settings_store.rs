use std::path::{Path, PathBuf};
use tokio::fs as async_fs;
use tracing::debug;

use crate::common::error::BulkerError;
use crate::common::result::{BulkerResult, ResultExt};
use crate::domain::entities::Registry;

/// Default file name of the settings file
pub const SETTINGS_FILE: &str = "settings.yaml";

/// Reads and rewrites the repository/group settings file.
///
/// The whole file is loaded into memory and fully rewritten on every
/// mutation; concurrent invocations are not coordinated.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the registry; a missing file is an empty registry
    pub async fn load(&self) -> BulkerResult<Registry> {
        if !async_fs::try_exists(&self.path).await.unwrap_or(false) {
            debug!(path = %self.path.display(), "settings file not found, using empty registry");
            return Ok(Registry::default());
        }

        let content = async_fs::read_to_string(&self.path).await.map_err(|e| {
            BulkerError::filesystem_error_with_source(
                "failed to read settings",
                Some(self.path.clone()),
                e,
            )
        })?;

        Self::parse(&content).context(format!("invalid settings file {}", self.path.display()))
    }

    pub async fn save(&self, registry: &Registry) -> BulkerResult<()> {
        let content = Self::render(registry)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent).await.map_err(|e| {
                    BulkerError::filesystem_error_with_source(
                        "failed to create settings directory",
                        Some(parent.to_path_buf()),
                        e,
                    )
                })?;
            }
        }

        async_fs::write(&self.path, content).await.map_err(|e| {
            BulkerError::filesystem_error_with_source(
                "failed to write settings",
                Some(self.path.clone()),
                e,
            )
        })?;

        debug!(
            path = %self.path.display(),
            repos = registry.repos.len(),
            groups = registry.groups.len(),
            "settings saved"
        );
        Ok(())
    }

    pub fn parse(content: &str) -> BulkerResult<Registry> {
        if content.trim().is_empty() {
            return Ok(Registry::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn render(registry: &Registry) -> BulkerResult<String> {
        Ok(serde_yaml::to_string(registry)?)
    }
}
