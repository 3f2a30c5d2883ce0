use std::path::{Path, PathBuf};
use tokio::fs as async_fs;
use walkdir::WalkDir;

use crate::common::error::BulkerError;
use crate::common::result::BulkerResult;

/// Directories never descended into by [`FileSystem::walk_files`]
const SKIPPED_DIRS: &[&str] = &[".git"];

/// Filesystem handle rooted at the workspace directory.
///
/// Stateless apart from the root, so one instance is shared by every
/// repository task.
#[derive(Debug, Clone)]
pub struct FileSystem {
    root: PathBuf,
}

impl FileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// On-disk location of a repository working copy
    pub fn repo_path(&self, repo_name: &str) -> PathBuf {
        self.root.join(repo_name)
    }

    /// Create the workspace root if needed
    pub async fn ensure_root(&self) -> BulkerResult<()> {
        async_fs::create_dir_all(&self.root).await.map_err(|e| {
            BulkerError::filesystem_error_with_source(
                "failed to create workspace directory",
                Some(self.root.clone()),
                e,
            )
        })
    }

    pub async fn exists(&self, path: &Path) -> bool {
        async_fs::try_exists(path).await.unwrap_or(false)
    }

    /// Whether both paths resolve to the same existing file
    pub async fn same_file(&self, a: &Path, b: &Path) -> bool {
        match (async_fs::canonicalize(a).await, async_fs::canonicalize(b).await) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    pub async fn read_to_string(&self, path: &Path) -> BulkerResult<String> {
        async_fs::read_to_string(path).await.map_err(|e| {
            BulkerError::filesystem_error_with_source(
                format!("failed to read {}", path.display()),
                Some(path.to_path_buf()),
                e,
            )
        })
    }

    pub async fn write(&self, path: &Path, contents: &str) -> BulkerResult<()> {
        self.ensure_parent(path).await?;
        async_fs::write(path, contents).await.map_err(|e| {
            BulkerError::filesystem_error_with_source(
                format!("failed to write {}", path.display()),
                Some(path.to_path_buf()),
                e,
            )
        })
    }

    pub async fn copy(&self, from: &Path, to: &Path) -> BulkerResult<u64> {
        self.ensure_parent(to).await?;
        async_fs::copy(from, to).await.map_err(|e| {
            BulkerError::filesystem_error_with_source(
                format!("failed to copy {} to {}", from.display(), to.display()),
                Some(from.to_path_buf()),
                e,
            )
        })
    }

    pub async fn rename(&self, from: &Path, to: &Path) -> BulkerResult<()> {
        self.ensure_parent(to).await?;
        async_fs::rename(from, to).await.map_err(|e| {
            BulkerError::filesystem_error_with_source(
                format!("failed to rename {} to {}", from.display(), to.display()),
                Some(from.to_path_buf()),
                e,
            )
        })
    }

    /// Regular files under `dir`, sorted, skipping VCS metadata directories
    pub async fn walk_files(&self, dir: &Path) -> BulkerResult<Vec<PathBuf>> {
        let dir = dir.to_path_buf();
        tokio::task::spawn_blocking(move || walk_files_blocking(&dir))
            .await
            .map_err(|e| BulkerError::internal_error(format!("directory walk failed: {}", e)))?
    }

    async fn ensure_parent(&self, path: &Path) -> BulkerResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent).await.map_err(|e| {
                    BulkerError::filesystem_error_with_source(
                        format!("failed to create {}", parent.display()),
                        Some(parent.to_path_buf()),
                        e,
                    )
                })?;
            }
        }
        Ok(())
    }
}

fn walk_files_blocking(dir: &Path) -> BulkerResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            !(e.file_type().is_dir()
                && SKIPPED_DIRS.iter().any(|s| e.file_name().to_str() == Some(*s)))
        });

    for entry in walker {
        let entry = entry.map_err(|e| {
            BulkerError::filesystem_error(
                format!("directory walk failed: {}", e),
                e.path().map(Path::to_path_buf),
            )
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
