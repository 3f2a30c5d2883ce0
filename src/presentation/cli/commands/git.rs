use anyhow::Result;
use clap::Subcommand;

use super::CommandContext;
use crate::application::operations::{
    BranchAction, BranchCommand, CloneRepo, ListBranches, PullRepo, PushRepo, RepoStatus,
};
use crate::domain::value_objects::BranchScope;

/// `bulker git ...`
#[derive(Subcommand, Debug)]
pub enum GitCommands {
    /// Clone repositories that are not in the workspace yet
    Clone,

    /// Fast-forward pull in every cloned repository
    Pull,

    /// Push the current branch
    Push,

    /// Show the current branch and working tree state
    Status,

    /// List or manage branches
    Branches {
        #[command(subcommand)]
        command: BranchCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum BranchCommands {
    /// List branches
    List {
        /// Which branches to list: local, remote, all
        #[arg(long, default_value_t = BranchScope::Local)]
        scope: BranchScope,
    },

    /// Create a branch at HEAD
    Create { branch: String },

    /// Delete a merged local branch
    Delete { branch: String },

    /// Check out an existing branch
    Checkout { branch: String },
}

impl GitCommands {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Clone => ctx.run_operation(CloneRepo).await,
            Self::Pull => ctx.run_operation(PullRepo).await,
            Self::Push => ctx.run_operation(PushRepo).await,
            Self::Status => ctx.run_operation(RepoStatus).await,
            Self::Branches { command } => match command {
                BranchCommands::List { scope } => {
                    ctx.run_operation(ListBranches { scope: *scope }).await
                }
                BranchCommands::Create { branch } => {
                    ctx.run_operation(BranchAction::new(BranchCommand::Create, branch))
                        .await
                }
                BranchCommands::Delete { branch } => {
                    ctx.run_operation(BranchAction::new(BranchCommand::Delete, branch))
                        .await
                }
                BranchCommands::Checkout { branch } => {
                    ctx.run_operation(BranchAction::new(BranchCommand::Checkout, branch))
                        .await
                }
            },
        }
    }
}
