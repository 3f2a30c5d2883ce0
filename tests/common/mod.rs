//! Shared fixtures for the integration tests
#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Settings with three repositories and one group
pub const SETTINGS: &str = r#"repos:
  - name: api
    url: git@example.com:org/api.git
    tags: [backend]
  - name: cli
    url: git@example.com:org/cli.git
    tags: [backend, tools]
  - name: web
    url: git@example.com:org/web.git
    tags: [frontend]
groups:
  - name: core
    repos: [api, web]
"#;

/// A scratch settings file plus workspace directory
pub struct TestWorkspace {
    temp: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("failed to create temp dir");
        fs::create_dir_all(temp.path().join("work")).expect("failed to create workspace");
        Self { temp }
    }

    pub fn with_settings(content: &str) -> Self {
        let ws = Self::new();
        ws.write_settings(content);
        ws
    }

    pub fn settings_path(&self) -> PathBuf {
        self.temp.path().join("settings.yaml")
    }

    pub fn workspace(&self) -> PathBuf {
        self.temp.path().join("work")
    }

    pub fn write_settings(&self, content: &str) {
        fs::write(self.settings_path(), content).expect("failed to write settings");
    }

    pub fn read_settings(&self) -> String {
        fs::read_to_string(self.settings_path()).unwrap_or_default()
    }

    /// Write `rel` inside the working copy of `repo`
    pub fn write_repo_file(&self, repo: &str, rel: &str, content: &str) -> PathBuf {
        let path = self.workspace().join(repo).join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create repo dir");
        }
        fs::write(&path, content).expect("failed to write repo file");
        path
    }

    pub fn repo_path(&self, repo: &str, rel: &str) -> PathBuf {
        self.workspace().join(repo).join(rel)
    }

    /// The `bulker` binary isolated from the user's config and environment
    pub fn bulker(&self) -> Command {
        let mut cmd = Command::cargo_bin("bulker").expect("binary not built");
        cmd.env("BULKER_SETTINGS", self.settings_path())
            .env("BULKER_WORKSPACE", self.workspace())
            .env("BULKER_CONFIG", self.temp.path().join("config.yaml"))
            .env_remove("BULKER_OUTPUT")
            .env_remove("BULKER_MODE")
            .env_remove("BULKER_LOG")
            .env_remove("RUST_LOG")
            .arg("--no-color")
            .arg("--no-progress");
        cmd
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }
}
