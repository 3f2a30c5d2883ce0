//! Infrastructure layer
//!
//! Concrete implementations for external interactions:
//! - process execution and the `git` wrapper
//! - the workspace filesystem handle
//! - settings and configuration files
pub mod filesystem;
pub mod git;
pub mod shell;
pub mod store;

pub use filesystem::FileSystem;
pub use git::Git;
pub use shell::{CommandOutput, ProcessShell, Shell};
pub use store::{ConfigStore, SettingsStore};
