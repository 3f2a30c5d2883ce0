use anyhow::Result;
use clap::Args;
use std::time::Duration;

use super::CommandContext;
use crate::application::operations::ExecCommand;

/// `bulker exec [--timeout <secs>] -- <program> [args]...`
#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Kill the command after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Program and arguments, run with each repository as working directory
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl ExecArgs {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let operation = ExecCommand::new(self.timeout.map(Duration::from_secs));
        ctx.run_operation_with_args(operation, self.command.clone()).await
    }
}
