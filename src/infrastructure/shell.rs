use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::common::error::BulkerError;
use crate::common::result::BulkerResult;

/// Captured result of an external process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs external programs on behalf of an operation.
///
/// Implementations hold no per-call state and are shared by every
/// concurrent repository task.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Shell: Send + Sync {
    /// Run `program args...` with `dir` as working directory
    async fn run(&self, dir: &Path, program: &str, args: &[String]) -> BulkerResult<CommandOutput>;
}

/// Runs `program` and turns a non-zero exit into a [`BulkerError::CommandError`]
/// carrying stderr.
pub async fn run_checked(
    shell: &dyn Shell,
    dir: &Path,
    program: &str,
    args: &[String],
) -> BulkerResult<String> {
    let output = shell.run(dir, program, args).await?;

    if !output.success() {
        let command = format!("{} {}", program, args.join(" "));
        let stderr = output.stderr.trim();
        let message = if stderr.is_empty() {
            format!("'{}' exited with {:?}", command, output.exit_code)
        } else {
            stderr.to_string()
        };
        return Err(BulkerError::command_error(message, command, output.exit_code));
    }

    Ok(output.stdout.trim_end().to_string())
}

/// [`Shell`] backed by `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessShell;

impl ProcessShell {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Shell for ProcessShell {
    async fn run(&self, dir: &Path, program: &str, args: &[String]) -> BulkerResult<CommandOutput> {
        debug!(program, ?args, dir = %dir.display(), "spawning process");

        let output = Command::new(program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                BulkerError::command_error(
                    format!("failed to start '{}': {}", program, e),
                    program,
                    None,
                )
            })?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
