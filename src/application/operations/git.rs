use async_trait::async_trait;
use serde::Serialize;

use crate::application::context::ExecutionContext;
use crate::application::record::Record;
use crate::application::runner::{Operation, OperationResult};
use crate::common::error::BulkerError;
use crate::domain::value_objects::BranchScope;
use crate::infrastructure::Git;

/// `git clone` into the workspace; an existing clone is a soft skip
#[derive(Debug, Clone, Copy, Default)]
pub struct CloneRepo;

#[async_trait]
impl Operation for CloneRepo {
    async fn run(&self, ctx: ExecutionContext) -> OperationResult {
        if ctx.is_cloned().await {
            return Ok(Some(Record::skipped("already cloned")));
        }
        if ctx.fs.exists(&ctx.path).await {
            return Err(BulkerError::filesystem_error(
                "directory exists but is not a git repository",
                Some(ctx.path.clone()),
            ));
        }

        ctx.fs.ensure_root().await?;
        Git::new(ctx.shell.as_ref(), ctx.fs.root())
            .clone_into(&ctx.repo.url, &ctx.path)
            .await?;
        Ok(Some(Record::status("cloned")))
    }
}

/// `git pull --ff-only`
#[derive(Debug, Clone, Copy, Default)]
pub struct PullRepo;

#[async_trait]
impl Operation for PullRepo {
    async fn run(&self, ctx: ExecutionContext) -> OperationResult {
        if !ctx.is_cloned().await {
            return Ok(None);
        }
        ctx.git().pull().await?;
        Ok(Some(Record::status("updated")))
    }
}

/// `git push`
#[derive(Debug, Clone, Copy, Default)]
pub struct PushRepo;

#[async_trait]
impl Operation for PushRepo {
    async fn run(&self, ctx: ExecutionContext) -> OperationResult {
        if !ctx.is_cloned().await {
            return Ok(None);
        }
        ctx.git().push().await?;
        Ok(Some(Record::status("pushed")))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    branch: String,
    clean: bool,
    changes: usize,
}

/// Current branch and working tree state
#[derive(Debug, Clone, Copy, Default)]
pub struct RepoStatus;

#[async_trait]
impl Operation for RepoStatus {
    async fn run(&self, ctx: ExecutionContext) -> OperationResult {
        if !ctx.is_cloned().await {
            return Ok(None);
        }

        let git = ctx.git();
        let branch = git.current_branch().await?;
        let changes = git.changes().await?.len();
        let report = StatusReport {
            branch,
            clean: changes == 0,
            changes,
        };
        Ok(Some(Record::from_serialize(&report)?))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BranchesReport {
    current: String,
    branches: Vec<String>,
}

/// `git branches list`
#[derive(Debug, Clone, Copy, Default)]
pub struct ListBranches {
    pub scope: BranchScope,
}

#[async_trait]
impl Operation for ListBranches {
    async fn run(&self, ctx: ExecutionContext) -> OperationResult {
        if !ctx.is_cloned().await {
            return Ok(None);
        }

        let git = ctx.git();
        let report = BranchesReport {
            current: git.current_branch().await?,
            branches: git.branches(self.scope).await?,
        };
        Ok(Some(Record::from_serialize(&report)?))
    }
}

/// Branch mutation applied by [`BranchAction`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchCommand {
    Create,
    Delete,
    Checkout,
}

/// `git branches create|delete|checkout <name>`
///
/// Re-applying an action that already holds (branch exists, is gone, is
/// checked out) reports a skip instead of failing.
#[derive(Debug, Clone)]
pub struct BranchAction {
    pub command: BranchCommand,
    pub branch: String,
}

impl BranchAction {
    pub fn new(command: BranchCommand, branch: impl Into<String>) -> Self {
        Self {
            command,
            branch: branch.into(),
        }
    }
}

#[async_trait]
impl Operation for BranchAction {
    async fn run(&self, ctx: ExecutionContext) -> OperationResult {
        if !ctx.is_cloned().await {
            return Ok(None);
        }

        let git = ctx.git();
        let exists = git
            .branches(BranchScope::Local)
            .await?
            .iter()
            .any(|b| *b == self.branch);

        let record = match self.command {
            BranchCommand::Create if exists => Record::skipped("branch already exists"),
            BranchCommand::Create => {
                git.create_branch(&self.branch).await?;
                Record::status("created")
            }
            BranchCommand::Delete if !exists => Record::skipped("no such branch"),
            BranchCommand::Delete => {
                git.delete_branch(&self.branch).await?;
                Record::status("deleted")
            }
            BranchCommand::Checkout => {
                if git.current_branch().await? == self.branch {
                    Record::skipped("already checked out")
                } else {
                    git.checkout(&self.branch).await?;
                    Record::status("checked-out")
                }
            }
        };
        Ok(Some(record.with("branch", self.branch.clone())))
    }
}
