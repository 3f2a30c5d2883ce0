//! ランナーと出力の統合テスト
//!
//! 設定ファイルから読み込んだレジストリに対して操作を実行し、
//! 集約結果と描画結果を検証する

mod common;

use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

use bulker::application::operations::{ListRepos, SearchFiles};
use bulker::application::{AppConfig, ExecutionContext, OperationResult, Record, Renderer, Runner};
use bulker::domain::entities::{Registry, Repository};
use bulker::domain::value_objects::{OutputFormat, RepoFilter, RunMode};
use bulker::infrastructure::{ProcessShell, SettingsStore};
use bulker::{BulkerError, ErrorKind};
use common::{TestWorkspace, SETTINGS};

async fn load_registry(ws: &TestWorkspace) -> Registry {
    SettingsStore::new(ws.settings_path()).load().await.unwrap()
}

fn runner(ws: &TestWorkspace, mode: RunMode) -> Runner {
    let config = AppConfig::for_workspace(ws.workspace())
        .with_settings(ws.settings_path())
        .with_mode(mode)
        .with_progress(false);
    Runner::new(config, Arc::new(ProcessShell::new()))
}

/// a: 成功、b: エラー、c: 該当なし
async fn mixed_operation(ctx: ExecutionContext) -> OperationResult {
    match ctx.repo.name.as_str() {
        "api" => {
            tokio::time::sleep(Duration::from_millis(40)).await;
            Ok(Some(Record::new().with("x", 1)))
        }
        "cli" => Err(BulkerError::internal_error("boom")),
        _ => Ok(None),
    }
}

#[tokio::test]
async fn test_failures_are_counted_and_rendered_in_order() {
    let ws = TestWorkspace::with_settings(SETTINGS);
    let registry = load_registry(&ws).await;
    let renderer = Renderer::new(OutputFormat::Line, "repo");
    let mut out = Vec::new();

    let err = runner(&ws, RunMode::Parallel)
        .run(&registry, &RepoFilter::all(), mixed_operation, &renderer, &mut out)
        .await
        .unwrap_err();

    assert!(err.is(ErrorKind::RepositoriesFailed));
    assert_eq!(err.to_string(), "1 repositories failed");
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "api: x=1\ncli: Internal error: boom\n"
    );
}

#[tokio::test]
async fn test_sequential_and_parallel_render_identically() {
    let ws = TestWorkspace::with_settings(SETTINGS);
    let registry = load_registry(&ws).await;

    for format in [OutputFormat::Json, OutputFormat::Line, OutputFormat::Log, OutputFormat::Table] {
        let renderer = Renderer::new(format, "repo");
        let mut sequential = Vec::new();
        let mut parallel = Vec::new();

        runner(&ws, RunMode::Sequential)
            .run(&registry, &RepoFilter::all(), ListRepos, &renderer, &mut sequential)
            .await
            .unwrap();
        runner(&ws, RunMode::Parallel)
            .run(&registry, &RepoFilter::all(), ListRepos, &renderer, &mut parallel)
            .await
            .unwrap();

        assert_eq!(
            String::from_utf8(sequential).unwrap(),
            String::from_utf8(parallel).unwrap()
        );
    }
}

#[tokio::test]
async fn test_tag_filter_selects_subset() {
    let ws = TestWorkspace::with_settings(SETTINGS);
    let registry = load_registry(&ws).await;
    let renderer = Renderer::new(OutputFormat::Line, "repo");
    let mut out = Vec::new();

    let filter = RepoFilter::new(Vec::<String>::new(), ["backend"]);
    let summary = runner(&ws, RunMode::Parallel)
        .run(&registry, &filter, ListRepos, &renderer, &mut out)
        .await
        .unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "api: url=git@example.com:org/api.git tags=backend\n\
         cli: url=git@example.com:org/cli.git tags=backend,tools\n"
    );
}

#[tokio::test]
async fn test_all_empty_results_render_empty_json_array() {
    let ws = TestWorkspace::with_settings(SETTINGS);
    let registry = load_registry(&ws).await;
    let renderer = Renderer::new(OutputFormat::Json, "repo");
    let mut out = Vec::new();

    // 作業ツリーが存在しないため全リポジトリが「該当なし」
    let op = SearchFiles {
        pattern: regex::Regex::new("TODO").unwrap(),
    };
    let summary = runner(&ws, RunMode::Parallel)
        .run(&registry, &RepoFilter::all(), op, &renderer, &mut out)
        .await
        .unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.skipped, 3);
    assert_eq!(String::from_utf8(out).unwrap(), "[]\n");
}

#[tokio::test]
async fn test_search_across_workspace() {
    let ws = TestWorkspace::with_settings(SETTINGS);
    ws.write_repo_file("api", "src/main.rs", "// TODO: wire config\n");
    ws.write_repo_file("web", "index.html", "<html></html>\n");
    let registry = load_registry(&ws).await;
    let renderer = Renderer::new(OutputFormat::Json, "repo");
    let mut out = Vec::new();

    let op = SearchFiles {
        pattern: regex::Regex::new("TODO").unwrap(),
    };
    runner(&ws, RunMode::Sequential)
        .run(&registry, &RepoFilter::all(), op, &renderer, &mut out)
        .await
        .unwrap();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{"repo": "api", "files": ["src/main.rs"], "matches": 1}])
    );
}

#[tokio::test]
async fn test_one_failure_among_three_parallel_repositories() {
    let ws = TestWorkspace::new();
    let registry = Registry::new(
        ["C", "A", "B"]
            .iter()
            .map(|n| Repository::new(*n, format!("url-{}", n)))
            .collect(),
        Vec::new(),
    );
    let renderer = Renderer::new(OutputFormat::Line, "repo");
    let mut out = Vec::new();

    let op = |ctx: ExecutionContext| async move {
        if ctx.repo.name == "B" {
            return OperationResult::Err(BulkerError::command_error(
                "fatal: remote hung up",
                "git pull",
                Some(1),
            ));
        }
        OperationResult::Ok(Some(Record::status("updated")))
    };
    let err = runner(&ws, RunMode::Parallel)
        .run(&registry, &RepoFilter::all(), op, &renderer, &mut out)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "1 repositories failed");
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "A: status=updated\nB: fatal: remote hung up\nC: status=updated\n"
    );
}
