use async_trait::async_trait;
use futures::FutureExt;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::any::Any;
use std::future::Future;
use std::io::{IsTerminal, Write};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::config::AppConfig;
use super::context::{ContextBuilder, ExecutionContext};
use super::outcome::{Outcome, Outcomes, RunSummary};
use super::record::Record;
use super::render::Renderer;
use crate::common::error::BulkerError;
use crate::common::result::BulkerResult;
use crate::domain::entities::{Registry, Repository};
use crate::domain::value_objects::{RepoFilter, RunMode};
use crate::infrastructure::Shell;

/// 操作の戻り値。`Ok(None)`は「該当なし」を表す
pub type OperationResult = BulkerResult<Option<Record>>;

/// リポジトリ単位の操作
#[async_trait]
pub trait Operation: Send + Sync {
    async fn run(&self, ctx: ExecutionContext) -> OperationResult;
}

#[async_trait]
impl<F, Fut> Operation for F
where
    F: Fn(ExecutionContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = OperationResult> + Send + 'static,
{
    async fn run(&self, ctx: ExecutionContext) -> OperationResult {
        (self)(ctx).await
    }
}

/// 選択された全リポジトリに対して操作を実行するランナー
///
/// 1つのリポジトリの失敗やパニックが他のリポジトリの実行を中断することはない。
pub struct Runner {
    /// 設定
    config: Arc<AppConfig>,

    /// コンテキスト生成
    contexts: ContextBuilder,
}

impl Runner {
    /// 新しいRunnerインスタンスを作成
    pub fn new(config: AppConfig, shell: Arc<dyn Shell>) -> Self {
        Self::with_args(config, shell, Vec::new())
    }

    /// 位置引数付きでRunnerを作成
    pub fn with_args(config: AppConfig, shell: Arc<dyn Shell>, args: Vec<String>) -> Self {
        let config = Arc::new(config);
        let contexts = ContextBuilder::new(Arc::clone(&config), shell, args);
        Self { config, contexts }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 実行して結果を描画し、失敗件数があればエラーを返す
    pub async fn run<O, W>(
        &self,
        registry: &Registry,
        filter: &RepoFilter,
        operation: O,
        renderer: &Renderer,
        out: &mut W,
    ) -> BulkerResult<RunSummary>
    where
        O: Operation + 'static,
        W: Write,
    {
        let outcomes = self.execute(&registry.repos, filter, operation).await;
        renderer.render(&outcomes, out)?;
        outcomes.check()
    }

    /// 実行して結果を収集する
    pub async fn execute<O>(
        &self,
        repos: &[Repository],
        filter: &RepoFilter,
        operation: O,
    ) -> Outcomes
    where
        O: Operation + 'static,
    {
        // 1. 実行対象リポジトリの決定
        let selected = filter.select(repos);
        debug!(mode = %self.config.mode, repos = selected.len(), "running operation");

        if selected.is_empty() {
            return Outcomes::new();
        }

        // 2. 実行（並列または順次）
        let operation: Arc<dyn Operation> = Arc::new(operation);
        let mut outcomes = match self.config.mode {
            RunMode::Sequential => self.execute_sequential(&selected, operation).await,
            RunMode::Parallel => self.execute_parallel(&selected, operation).await,
        };

        // 3. 報告のなかったリポジトリをエラーとして補完する
        for repo in &selected {
            if !outcomes.contains(&repo.name) {
                warn!(repo = %repo.name, "operation did not report an outcome");
                outcomes.insert(Outcome::failure(
                    repo.name.clone(),
                    BulkerError::internal_error("operation did not report an outcome"),
                ));
            }
        }

        outcomes
    }

    /// 順次実行（レジストリ順）
    async fn execute_sequential(
        &self,
        selected: &[&Repository],
        operation: Arc<dyn Operation>,
    ) -> Outcomes {
        let mut outcomes = Outcomes::new();

        for repo in selected {
            let ctx = self.contexts.build(repo);
            let outcome = invoke(operation.as_ref(), repo.name.clone(), ctx).await;
            log_outcome(&outcome);
            outcomes.insert(outcome);
        }

        outcomes
    }

    /// 並列実行（リポジトリごとに1タスク、結果はチャネル経由で1か所に集約）
    async fn execute_parallel(
        &self,
        selected: &[&Repository],
        operation: Arc<dyn Operation>,
    ) -> Outcomes {
        let (tx, mut rx) = mpsc::unbounded_channel::<Outcome>();

        for repo in selected {
            let ctx = self.contexts.build(repo);
            let name = repo.name.clone();
            let operation = Arc::clone(&operation);
            let tx = tx.clone();

            tokio::spawn(async move {
                let outcome = invoke(operation.as_ref(), name, ctx).await;
                // 受信側は全送信側がドロップされるまで生存している
                let _ = tx.send(outcome);
            });
        }
        drop(tx);

        let progress = self.progress_bar(selected.len());
        let mut outcomes = Outcomes::new();
        while let Some(outcome) = rx.recv().await {
            progress.set_message(outcome.name.clone());
            progress.inc(1);
            log_outcome(&outcome);
            outcomes.insert(outcome);
        }
        progress.finish_and_clear();

        outcomes
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.config.progress || !std::io::stderr().is_terminal() {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::with_draw_target(Some(len as u64), ProgressDrawTarget::stderr());
        let template = "{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}";
        if let Ok(style) = ProgressStyle::with_template(template) {
            bar.set_style(style.progress_chars("=> "));
        }
        bar
    }
}

/// 操作を呼び出し、パニックをそのリポジトリのエラーに変換する
async fn invoke(operation: &dyn Operation, name: String, ctx: ExecutionContext) -> Outcome {
    match AssertUnwindSafe(operation.run(ctx)).catch_unwind().await {
        Ok(result) => Outcome::from_result(name, result),
        Err(payload) => {
            Outcome::failure(name, BulkerError::panicked(panic_message(payload.as_ref())))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn log_outcome(outcome: &Outcome) {
    match &outcome.error {
        Some(e) => debug!(repo = %outcome.name, error = %e, "operation failed"),
        None => debug!(repo = %outcome.name, empty = outcome.is_empty(), "operation finished"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::ErrorKind;
    use crate::domain::value_objects::OutputFormat;
    use crate::infrastructure::ProcessShell;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn runner(mode: RunMode) -> Runner {
        let config = AppConfig::for_workspace("/work")
            .with_mode(mode)
            .with_progress(false);
        Runner::new(config, Arc::new(ProcessShell::new()))
    }

    fn registry(names: &[&str]) -> Registry {
        Registry::new(
            names.iter().map(|n| Repository::new(*n, format!("url-{}", n))).collect(),
            Vec::new(),
        )
    }

    #[tokio::test]
    async fn test_zero_matching_repositories() {
        let runner = runner(RunMode::Parallel);
        let registry = registry(&["a"]);
        let filter = RepoFilter::new(["missing"], Vec::<String>::new());
        let renderer = Renderer::new(OutputFormat::Json, "repo");
        let mut out = Vec::new();

        let summary = runner
            .run(
                &registry,
                &filter,
                |_ctx: ExecutionContext| async { OperationResult::Ok(Some(Record::status("ok"))) },
                &renderer,
                &mut out,
            )
            .await
            .unwrap();

        assert_eq!(summary.total, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "[]\n");
    }

    #[tokio::test]
    async fn test_panic_is_isolated() {
        for mode in [RunMode::Sequential, RunMode::Parallel] {
            let repos = registry(&["a", "b", "c"]).repos;
            let outcomes = runner(mode)
                .execute(&repos, &RepoFilter::all(), |ctx: ExecutionContext| async move {
                    if ctx.repo.name == "b" {
                        panic!("exploded in b");
                    }
                    OperationResult::Ok(Some(Record::status("ok")))
                })
                .await;

            assert_eq!(outcomes.len(), 3);
            let b = outcomes.get("b").unwrap();
            assert!(b.error.as_ref().unwrap().is(ErrorKind::Panicked));
            assert_eq!(b.error.as_ref().unwrap().to_string(), "operation panicked: exploded in b");
            assert!(!outcomes.get("a").unwrap().is_failure());
            assert!(!outcomes.get("c").unwrap().is_failure());
        }
    }

    #[tokio::test]
    async fn test_each_repository_invoked_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let repos = registry(&["a", "b", "c", "d"]).repos;
        let outcomes = runner(RunMode::Parallel)
            .execute(&repos, &RepoFilter::all(), move |_ctx: ExecutionContext| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    OperationResult::Ok(None)
                }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes.visible().count(), 0);
    }

    #[tokio::test]
    async fn test_sequential_runs_in_registry_order() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen = Arc::clone(&order);
        let repos = registry(&["b", "a", "c"]).repos;
        runner(RunMode::Sequential)
            .execute(&repos, &RepoFilter::all(), move |ctx: ExecutionContext| {
                let seen = Arc::clone(&seen);
                async move {
                    seen.lock().unwrap().push(ctx.repo.name.clone());
                    OperationResult::Ok(None)
                }
            })
            .await;

        assert_eq!(*order.lock().unwrap(), vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_parallel_completion_order_does_not_matter() {
        let registry = registry(&["a", "b", "c"]);
        let renderer = Renderer::new(OutputFormat::Line, "repo");
        let mut out = Vec::new();

        let operation = |ctx: ExecutionContext| async move {
            // a finishes last, c first
            let delay = match ctx.repo.name.as_str() {
                "a" => 60,
                "b" => 30,
                _ => 0,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            OperationResult::Ok(Some(Record::new().with("url", ctx.repo.url.clone())))
        };

        runner(RunMode::Parallel)
            .run(&registry, &RepoFilter::all(), operation, &renderer, &mut out)
            .await
            .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "a: url=url-a\nb: url=url-b\nc: url=url-c\n"
        );
    }
}
