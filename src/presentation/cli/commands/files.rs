use anyhow::{bail, Result};
use clap::Subcommand;
use regex::Regex;
use std::path::PathBuf;

use super::CommandContext;
use crate::application::operations::{CopyFile, RenameFile, ReplaceInFiles, SearchFiles};
use crate::common::error::BulkerError;

/// `bulker files ...`; paths are relative to each repository
#[derive(Subcommand, Debug)]
pub enum FileCommands {
    /// Copy a file inside each repository
    Copy {
        #[arg(long)]
        source: PathBuf,
        #[arg(long)]
        target: PathBuf,
    },

    /// Move or rename a file inside each repository (source must be relative)
    Rename {
        #[arg(long)]
        source: PathBuf,
        #[arg(long)]
        target: PathBuf,
    },

    /// Find files with lines matching a regular expression
    Search {
        #[arg(long)]
        pattern: String,
    },

    /// Replace regular expression matches in every file
    Replace {
        #[arg(long)]
        pattern: String,
        /// Replacement text, `$1`/`${name}` refer to capture groups
        #[arg(long)]
        replacement: String,
    },
}

impl FileCommands {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Copy { source, target } => {
                ctx.run_operation(CopyFile {
                    source: source.clone(),
                    target: target.clone(),
                })
                .await
            }
            Self::Rename { source, target } => {
                if source.is_absolute() {
                    bail!("rename --source must be relative to each repository");
                }
                ctx.run_operation(RenameFile {
                    source: source.clone(),
                    target: target.clone(),
                })
                .await
            }
            Self::Search { pattern } => {
                let pattern = Regex::new(pattern).map_err(BulkerError::from)?;
                ctx.run_operation(SearchFiles { pattern }).await
            }
            Self::Replace {
                pattern,
                replacement,
            } => {
                let pattern = Regex::new(pattern).map_err(BulkerError::from)?;
                ctx.run_operation(ReplaceInFiles {
                    pattern,
                    replacement: replacement.clone(),
                })
                .await
            }
        }
    }
}
