pub mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::exit;
use tracing::debug;

use crate::application::config::{AppConfig, ConfigOverrides};
use crate::domain::value_objects::{OutputFormat, RunMode};
use crate::infrastructure::store::{self, config_store::CONFIG_FILE, ConfigStore, SettingsStore};
use commands::{
    CommandContext, ExecArgs, FileCommands, GitCommands, GroupCommands, PropCommands,
    RepoCommands,
};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("BULKER_GIT_HASH"),
    " ",
    env!("BULKER_BUILD_DATE"),
    ")"
);

/// bulker - run bulk operations across many repositories
#[derive(Parser, Debug)]
#[command(name = "bulker")]
#[command(about = "Run git actions, file edits and property lookups across many repositories")]
#[command(version = VERSION)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Select repositories by name (repeatable, comma separated)
    #[arg(short = 'n', long = "name", global = true, value_delimiter = ',')]
    pub names: Vec<String>,

    /// Select repositories carrying any of these tags (repeatable, comma separated)
    #[arg(short = 't', long = "tag", global = true, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Select the members of these groups (repeatable, comma separated);
    /// `groups` commands take their target group from it
    #[arg(short = 'g', long = "group", global = true, value_delimiter = ',')]
    pub groups: Vec<String>,

    /// Output format: line, json, log, table
    #[arg(short, long, global = true, env = "BULKER_OUTPUT")]
    pub output: Option<OutputFormat>,

    /// Execution mode: sequential, parallel
    #[arg(short, long, global = true, env = "BULKER_MODE")]
    pub mode: Option<RunMode>,

    /// Settings file with repositories and groups
    #[arg(long, global = true, env = "BULKER_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Directory repositories are cloned into (defaults to current directory)
    #[arg(short, long, global = true, env = "BULKER_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Configuration file with global defaults
    #[arg(long, global = true, env = "BULKER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Hide the progress bar in parallel mode
    #[arg(long, global = true)]
    pub no_progress: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage registered repositories
    Repos {
        #[command(subcommand)]
        command: RepoCommands,
    },

    /// Manage repository groups
    Groups {
        #[command(subcommand)]
        command: GroupCommands,
    },

    /// Run git actions in every selected repository
    Git {
        #[command(subcommand)]
        command: GitCommands,
    },

    /// Copy, rename, search and replace files
    Files {
        #[command(subcommand)]
        command: FileCommands,
    },

    /// Read values from JSON/YAML files
    Props {
        #[command(subcommand)]
        command: PropCommands,
    },

    /// Run a command in each repository
    Exec(ExecArgs),
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            output: self.output,
            mode: self.mode,
            settings: self.settings.clone(),
            workspace: self.workspace.clone(),
            progress: if self.no_progress { Some(false) } else { None },
        }
    }
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl CliApp {
    pub fn new() -> Self {
        Self { cli: Cli::parse() }
    }

    pub fn from_cli(cli: Cli) -> Self {
        Self { cli }
    }

    pub fn verbose(&self) -> bool {
        self.cli.verbose
    }

    pub async fn run(self) -> anyhow::Result<()> {
        if self.cli.no_color {
            colored::control::set_override(false);
        }

        match self.handle_command().await {
            Ok(_) => Ok(()),
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                exit(1);
            }
        }
    }

    async fn handle_command(&self) -> anyhow::Result<()> {
        let ctx = self.command_context().await?;

        match &self.cli.command {
            Commands::Repos { command } => command.execute(&ctx).await,
            Commands::Groups { command } => command.execute(&ctx).await,
            Commands::Git { command } => command.execute(&ctx).await,
            Commands::Files { command } => command.execute(&ctx).await,
            Commands::Props { command } => command.execute(&ctx).await,
            Commands::Exec(args) => args.execute(&ctx).await,
        }
    }

    /// Resolve configuration: flags and environment over the config file over defaults
    async fn command_context(&self) -> anyhow::Result<CommandContext> {
        let config_path = self
            .cli
            .config
            .clone()
            .unwrap_or_else(|| store::default_path(CONFIG_FILE));
        let file = ConfigStore::new(&config_path).load().await?;
        let config = AppConfig::resolve(file, self.cli.overrides())?;
        debug!(
            config = %config_path.display(),
            settings = %config.settings.display(),
            workspace = %config.workspace.display(),
            mode = %config.mode,
            output = %config.output,
            "resolved configuration"
        );

        let settings = SettingsStore::new(config.settings.clone());
        Ok(CommandContext::new(
            config,
            settings,
            self.cli.names.clone(),
            self.cli.tags.clone(),
        )
        .with_groups(self.cli.groups.clone()))
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}
