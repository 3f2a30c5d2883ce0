//! # bulker - bulk operations across many repositories
//!
//! `bulker` keeps a registry of repositories and groups and applies one
//! operation (a git action, a file edit, a property lookup, an arbitrary
//! command) to every selected repository, sequentially or in parallel.
//! Per-repository results are collected independently, so one failing
//! repository never stops the others, and rendered once in name order.
//!
//! ## Quick Start
//!
//! ```bash
//! bulker repos add -n api -u git@example.com:org/api.git -t backend
//! bulker repos add -n web -u git@example.com:org/web.git -t frontend
//! bulker git clone
//! bulker git status --tag backend -o table
//! bulker exec -- git log -1 --oneline
//! ```
//!
//! ## Architecture
//!
//! - [`domain`]: repositories, groups, the registry and the selection filter
//! - [`application`]: the runner, outcomes, rendering and the operation library
//! - [`infrastructure`]: process execution, git, filesystem, settings files
//! - [`presentation`]: CLI interface and logging
//! - [`common`]: error handling
//!
//! ## Using the Library
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bulker::application::{AppConfig, Renderer, Runner};
//! use bulker::application::operations::RepoStatus;
//! use bulker::domain::value_objects::{OutputFormat, RepoFilter};
//! use bulker::infrastructure::{ProcessShell, SettingsStore};
//!
//! # async fn example() -> bulker::Result<()> {
//! let config = AppConfig::for_workspace("/src/work");
//! let registry = SettingsStore::new(&config.settings).load().await?;
//! let runner = Runner::new(config, Arc::new(ProcessShell::new()));
//! let renderer = Renderer::new(OutputFormat::Table, "repo");
//!
//! let summary = runner
//!     .run(&registry, &RepoFilter::all(), RepoStatus, &renderer, &mut std::io::stdout())
//!     .await?;
//! println!("{} repositories", summary.total);
//! # Ok(())
//! # }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use crate::common::error::{BulkerError, ErrorKind};
pub use crate::common::result::BulkerResult as Result;
