use async_trait::async_trait;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::application::context::ExecutionContext;
use crate::application::record::Record;
use crate::application::runner::{Operation, OperationResult};
use crate::common::error::BulkerError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExecReport {
    exit_code: i32,
    output: String,
}

/// コンテキストの位置引数（`program args...`）を各リポジトリで実行する
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecCommand {
    /// コマンドのタイムアウト（Noneの場合は無制限）
    pub timeout: Option<Duration>,
}

impl ExecCommand {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Operation for ExecCommand {
    async fn run(&self, ctx: ExecutionContext) -> OperationResult {
        let Some((program, args)) = ctx.args.split_first() else {
            return Err(BulkerError::validation_error(
                "command",
                "no program given",
                None,
            ));
        };
        if !ctx.fs.exists(&ctx.path).await {
            return Ok(None);
        }

        let command = ctx.args.join(" ");
        let started = Instant::now();
        let run = ctx.shell.run(&ctx.path, program, args);
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, run).await.map_err(|_| {
                BulkerError::command_error(
                    format!("timed out after {}s", limit.as_secs()),
                    command.clone(),
                    None,
                )
            })??,
            None => run.await?,
        };
        debug!(
            repo = %ctx.repo.name,
            command = %command,
            exit_code = ?output.exit_code,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "command finished"
        );

        if !output.success() {
            let detail = output
                .stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .map(|l| format!(": {}", l.trim()))
                .unwrap_or_default();
            let message = match output.exit_code {
                Some(code) => format!("exited with code {}{}", code, detail),
                None => format!("terminated by signal{}", detail),
            };
            return Err(BulkerError::command_error(message, command, output.exit_code));
        }

        let report = ExecReport {
            exit_code: output.exit_code.unwrap_or_default(),
            output: output.stdout.trim_end().to_string(),
        };
        Ok(Some(Record::from_serialize(&report)?))
    }
}
