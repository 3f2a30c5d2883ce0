use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use super::CommandContext;
use crate::application::operations::GetProperty;

/// `bulker props ...`
#[derive(Subcommand, Debug)]
pub enum PropCommands {
    /// Print the value at a dotted path (`a.b.0.c`) of a JSON or YAML file
    Get {
        /// File relative to each repository
        #[arg(long)]
        file: PathBuf,
        /// Dotted path; numeric segments index into lists
        #[arg(long)]
        path: String,
    },
}

impl PropCommands {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Get { file, path } => {
                ctx.run_operation(GetProperty {
                    file: file.clone(),
                    path: path.clone(),
                })
                .await
            }
        }
    }
}
