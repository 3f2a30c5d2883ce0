use anyhow::{bail, Result};
use clap::Subcommand;

use super::{CommandContext, GROUP_ENTITY, REPO_ENTITY};
use crate::application::operations::groups;
use crate::application::outcome::{Outcome, Outcomes};
use crate::application::record::Record;

/// `bulker groups ...`; the group is given with `--group`, members with `--name`
#[derive(Subcommand, Debug)]
pub enum GroupCommands {
    /// List groups and their members
    List,

    /// Create a group, optionally with initial members
    Create,

    /// Delete a group
    Delete,

    /// Add repositories to a group
    Add,

    /// Remove repositories from a group
    Remove,
}

impl GroupCommands {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let mut registry = ctx.load_registry().await?;

        let (outcomes, entity) = match self {
            Self::List => {
                return ctx.render(&groups::list_groups(&registry), GROUP_ENTITY);
            }
            Self::Create if ctx.names.is_empty() => {
                let group = target_group(ctx)?;
                registry.add_group(group)?;
                (single(group, "created"), GROUP_ENTITY)
            }
            Self::Create => {
                let group = target_group(ctx)?;
                (groups::create_group(&mut registry, group, &ctx.names)?, REPO_ENTITY)
            }
            Self::Delete => {
                let group = target_group(ctx)?;
                registry.remove_group(group)?;
                (single(group, "deleted"), GROUP_ENTITY)
            }
            Self::Add => {
                let group = target_group(ctx)?;
                require_members(ctx)?;
                (groups::add_members(&mut registry, group, &ctx.names)?, REPO_ENTITY)
            }
            Self::Remove => {
                let group = target_group(ctx)?;
                require_members(ctx)?;
                (groups::remove_members(&mut registry, group, &ctx.names)?, REPO_ENTITY)
            }
        };

        ctx.save_registry(&registry).await?;
        ctx.render(&outcomes, entity)
    }
}

fn target_group(ctx: &CommandContext) -> Result<&str> {
    match ctx.groups.as_slice() {
        [group] => Ok(group),
        _ => bail!("groups commands need exactly one --group"),
    }
}

fn require_members(ctx: &CommandContext) -> Result<()> {
    if ctx.names.is_empty() {
        bail!("at least one --name is required");
    }
    Ok(())
}

fn single(name: &str, status: &str) -> Outcomes {
    std::iter::once(Outcome::success(name, Record::status(status))).collect()
}
