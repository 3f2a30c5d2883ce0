use anyhow::{bail, Result};
use clap::Subcommand;

use super::{CommandContext, REPO_ENTITY};
use crate::application::operations::ListRepos;
use crate::application::outcome::{Outcome, Outcomes};
use crate::application::record::Record;
use crate::domain::entities::Repository;

/// `bulker repos ...`
#[derive(Subcommand, Debug)]
pub enum RepoCommands {
    /// List the selected repositories
    List,

    /// Register a repository named by `--name`, tagged with `--tag`
    Add {
        /// Clone URL
        #[arg(short, long)]
        url: String,
    },

    /// Unregister the repositories named by `--name`
    Remove,
}

impl RepoCommands {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::List => ctx.run_operation(ListRepos).await,
            Self::Add { url } => add(ctx, url).await,
            Self::Remove => remove(ctx).await,
        }
    }
}

async fn add(ctx: &CommandContext, url: &str) -> Result<()> {
    let [name] = ctx.names.as_slice() else {
        bail!("repos add needs exactly one --name");
    };

    let mut registry = ctx.load_registry().await?;
    let repo = Repository::new(name.clone(), url).with_tags(ctx.tags.iter().cloned());
    registry.add_repo(repo)?;
    ctx.save_registry(&registry).await?;

    let outcomes: Outcomes = std::iter::once(Outcome::success(
        name.clone(),
        Record::status("added").with("url", url),
    ))
    .collect();
    ctx.render(&outcomes, REPO_ENTITY)
}

async fn remove(ctx: &CommandContext) -> Result<()> {
    if ctx.names.is_empty() {
        bail!("repos remove needs at least one --name");
    }

    let mut registry = ctx.load_registry().await?;
    let outcomes: Outcomes = ctx
        .names
        .iter()
        .map(|name| {
            let removed = registry
                .remove_repo(name)
                .map(|repo| Some(Record::status("removed").with("url", repo.url)));
            Outcome::from_result(name.clone(), removed)
        })
        .collect();

    if outcomes.summary().succeeded > 0 {
        ctx.save_registry(&registry).await?;
    }
    ctx.render(&outcomes, REPO_ENTITY)
}
