pub mod exec;
pub mod files;
pub mod git;
pub mod groups;
pub mod props;
pub mod repos;

pub use exec::ExecArgs;
pub use files::FileCommands;
pub use git::GitCommands;
pub use groups::GroupCommands;
pub use props::PropCommands;
pub use repos::RepoCommands;

use anyhow::Result;
use std::io;
use std::sync::Arc;
use tracing::debug;

use crate::application::config::AppConfig;
use crate::application::outcome::Outcomes;
use crate::application::render::Renderer;
use crate::application::runner::{Operation, Runner};
use crate::domain::entities::Registry;
use crate::domain::value_objects::RepoFilter;
use crate::infrastructure::{ProcessShell, SettingsStore};

/// Entity key for per-repository output
pub const REPO_ENTITY: &str = "repo";
/// Entity key for per-group output
pub const GROUP_ENTITY: &str = "group";

/// Everything a command handler needs: resolved config, selectors and the settings store
pub struct CommandContext {
    pub config: AppConfig,
    pub settings: SettingsStore,
    pub names: Vec<String>,
    pub tags: Vec<String>,
    pub groups: Vec<String>,
}

impl CommandContext {
    pub fn new(
        config: AppConfig,
        settings: SettingsStore,
        names: Vec<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            config,
            settings,
            names,
            tags,
            groups: Vec::new(),
        }
    }

    pub fn with_groups(mut self, groups: Vec<String>) -> Self {
        self.groups = groups;
        self
    }

    /// Name and tag selectors, plus the members of every `--group`.
    ///
    /// An unknown group fails before any repository is touched.
    pub fn filter(&self, registry: &Registry) -> Result<RepoFilter> {
        let filter = RepoFilter::new(self.names.iter().cloned(), self.tags.iter().cloned());
        if self.groups.is_empty() {
            return Ok(filter);
        }
        Ok(filter.with_group_members(registry.group_members(&self.groups)?))
    }

    pub async fn load_registry(&self) -> Result<Registry> {
        Ok(self.settings.load().await?)
    }

    pub async fn save_registry(&self, registry: &Registry) -> Result<()> {
        Ok(self.settings.save(registry).await?)
    }

    /// Run `operation` over the selected repositories and print the outcomes
    pub async fn run_operation<O>(&self, operation: O) -> Result<()>
    where
        O: Operation + 'static,
    {
        self.run_operation_with_args(operation, Vec::new()).await
    }

    pub async fn run_operation_with_args<O>(&self, operation: O, args: Vec<String>) -> Result<()>
    where
        O: Operation + 'static,
    {
        let registry = self.load_registry().await?;
        let filter = self.filter(&registry)?;
        let runner = Runner::with_args(self.config.clone(), Arc::new(ProcessShell::new()), args);
        let renderer = Renderer::new(self.config.output, REPO_ENTITY);

        let summary = runner
            .run(&registry, &filter, operation, &renderer, &mut io::stdout())
            .await?;
        debug!(
            total = summary.total,
            succeeded = summary.succeeded,
            skipped = summary.skipped,
            "run finished"
        );
        Ok(())
    }

    /// Print outcomes built without the runner and fail if any entry failed
    pub fn render(&self, outcomes: &Outcomes, entity: &str) -> Result<()> {
        Renderer::new(self.config.output, entity).render(outcomes, &mut io::stdout())?;
        outcomes.check()?;
        Ok(())
    }
}
