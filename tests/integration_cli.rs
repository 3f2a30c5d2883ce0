//! CLIのエンドツーエンドテスト

mod common;

use predicates::prelude::*;
use pretty_assertions::assert_eq;

use common::{TestWorkspace, SETTINGS};

#[test]
fn test_repos_add_list_remove() {
    let ws = TestWorkspace::new();

    ws.bulker()
        .args(["repos", "add", "-n", "api", "-u", "git@example.com:org/api.git", "-t", "backend"])
        .assert()
        .success()
        .stdout("api: status=added url=git@example.com:org/api.git\n");
    ws.bulker()
        .args(["repos", "add", "--name", "web", "--url", "git@example.com:org/web.git"])
        .assert()
        .success();

    let output = ws
        .bulker()
        .args(["repos", "list", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        value,
        serde_json::json!([
            {"repo": "api", "url": "git@example.com:org/api.git", "tags": ["backend"]},
            {"repo": "web", "url": "git@example.com:org/web.git", "tags": []}
        ])
    );

    ws.bulker()
        .args(["repos", "remove", "-n", "api"])
        .assert()
        .success()
        .stdout("api: status=removed url=git@example.com:org/api.git\n");
    assert!(!ws.read_settings().contains("api"));
}

#[test]
fn test_repos_add_duplicate_fails() {
    let ws = TestWorkspace::with_settings(SETTINGS);

    ws.bulker()
        .args(["repos", "add", "-n", "api", "-u", "other"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("repository 'api' already exists"));
    assert_eq!(ws.read_settings(), SETTINGS);
}

#[test]
fn test_repos_remove_unknown_is_reported_per_repo() {
    let ws = TestWorkspace::with_settings(SETTINGS);

    ws.bulker()
        .args(["repos", "remove", "-n", "ghost,web"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("ghost: repository 'ghost' not found"))
        .stdout(predicate::str::contains("web: status=removed"))
        .stderr(predicate::str::contains("1 repositories failed"));
    assert!(!ws.read_settings().contains("org/web.git"));
}

#[test]
fn test_group_add_is_idempotent() {
    let ws = TestWorkspace::with_settings(SETTINGS);

    ws.bulker()
        .args(["groups", "add", "-g", "core", "-n", "cli"])
        .assert()
        .success()
        .stdout("cli: status=added group=core\n");
    ws.bulker()
        .args(["groups", "add", "-g", "core", "-n", "cli"])
        .assert()
        .success()
        .stdout("cli: status=skipped group=core\n");

    ws.bulker()
        .args(["groups", "list"])
        .assert()
        .success()
        .stdout("core: repos=api,web,cli\n");
}

#[test]
fn test_group_add_unregistered_repo_fails() {
    let ws = TestWorkspace::with_settings(SETTINGS);

    ws.bulker()
        .args(["groups", "add", "-g", "core", "-n", "ghost"])
        .assert()
        .code(1)
        .stdout("ghost: repository 'ghost' is not registered\n")
        .stderr(predicate::str::contains("1 repositories failed"));
}

#[test]
fn test_group_create_and_delete() {
    let ws = TestWorkspace::with_settings(SETTINGS);

    ws.bulker()
        .args(["groups", "create", "-g", "tools"])
        .assert()
        .success()
        .stdout("tools: status=created\n");
    ws.bulker()
        .args(["groups", "create", "-g", "tools"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("group 'tools' already exists"));
    ws.bulker()
        .args(["groups", "delete", "-g", "tools"])
        .assert()
        .success()
        .stdout("tools: status=deleted\n");
}

#[test]
fn test_group_selector_expands_members() {
    let ws = TestWorkspace::with_settings(SETTINGS);

    ws.bulker()
        .args(["repos", "list", "--group", "core"])
        .assert()
        .success()
        .stdout(
            "api: url=git@example.com:org/api.git tags=backend\n\
             web: url=git@example.com:org/web.git tags=frontend\n",
        );

    // タグとの組み合わせは積集合
    ws.bulker()
        .args(["repos", "list", "-g", "core", "-t", "frontend"])
        .assert()
        .success()
        .stdout("web: url=git@example.com:org/web.git tags=frontend\n");
}

#[test]
fn test_unknown_group_selector_fails_fast() {
    let ws = TestWorkspace::with_settings(SETTINGS);
    ws.write_repo_file("api", "README.md", "api\n");

    ws.bulker()
        .args(["git", "status", "--group", "ghost"])
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("group 'ghost' not found"));
}

#[test]
fn test_git_status_on_empty_workspace_prints_nothing() {
    let ws = TestWorkspace::with_settings(SETTINGS);

    ws.bulker()
        .args(["git", "status", "-o", "json"])
        .assert()
        .success()
        .stdout("[]\n");
}

#[test]
fn test_files_search_with_name_selector() {
    let ws = TestWorkspace::with_settings(SETTINGS);
    ws.write_repo_file("api", "src/lib.rs", "// TODO: one\n// TODO: two\n");
    ws.write_repo_file("web", "app.js", "// TODO: three\n");

    ws.bulker()
        .args(["files", "search", "--pattern", "TODO", "-n", "api", "--mode", "sequential"])
        .assert()
        .success()
        .stdout("api: files=src/lib.rs matches=2\n");
}

#[test]
fn test_files_replace_rewrites_files() {
    let ws = TestWorkspace::with_settings(SETTINGS);
    let file = ws.write_repo_file("web", "package.json", "{\"license\": \"MIT\"}\n");

    ws.bulker()
        .args(["files", "replace", "--pattern", "MIT", "--replacement", "Apache-2.0"])
        .assert()
        .success()
        .stdout("web: files=package.json replacements=1\n");
    assert_eq!(
        std::fs::read_to_string(file).unwrap(),
        "{\"license\": \"Apache-2.0\"}\n"
    );
}

#[test]
fn test_rename_with_absolute_source_fails_before_running() {
    let ws = TestWorkspace::with_settings(SETTINGS);
    ws.write_repo_file("api", "README.md", "api\n");
    let shared = ws.path().join("shared.txt");
    std::fs::write(&shared, "shared").unwrap();

    ws.bulker()
        .args(["files", "rename", "--target", "moved.txt", "--source"])
        .arg(&shared)
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("must be relative"));
    assert!(shared.exists());
}

#[test]
fn test_invalid_pattern_fails_before_running() {
    let ws = TestWorkspace::with_settings(SETTINGS);

    ws.bulker()
        .args(["files", "search", "--pattern", "("])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid pattern"));
}

#[test]
fn test_props_get() {
    let ws = TestWorkspace::with_settings(SETTINGS);
    ws.write_repo_file("api", "package.json", r#"{"version": "1.4.0"}"#);
    ws.write_repo_file("web", "package.json", r#"{"version": "2.0.1"}"#);

    ws.bulker()
        .args(["props", "get", "--file", "package.json", "--path", "version"])
        .assert()
        .success()
        .stdout("api: value=1.4.0\nweb: value=2.0.1\n");
}

#[cfg(unix)]
#[test]
fn test_exec_failure_sets_exit_code() {
    let ws = TestWorkspace::with_settings(SETTINGS);
    ws.write_repo_file("api", "README.md", "api\n");
    ws.write_repo_file("cli", "README.md", "cli\n");

    ws.bulker()
        .args(["-o", "log", "exec", "--", "sh", "-c", "test \"$(cat README.md)\" = api"])
        .assert()
        .code(1)
        .stdout(
            "level=info repo=api exitCode=0 output=\"\"\n\
             level=error repo=cli error=\"exited with code 1\"\n",
        )
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("1 repositories failed"));
}

#[cfg(unix)]
#[test]
fn test_exec_reports_output() {
    let ws = TestWorkspace::with_settings(SETTINGS);
    ws.write_repo_file("web", "README.md", "web\n");

    ws.bulker()
        .args(["exec", "--", "cat", "README.md"])
        .assert()
        .success()
        .stdout("web: exitCode=0 output=web\n");
}

#[test]
fn test_output_format_from_environment() {
    let ws = TestWorkspace::with_settings(SETTINGS);

    ws.bulker()
        .env("BULKER_OUTPUT", "json")
        .args(["groups", "list"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("["));
}

#[test]
fn test_config_file_defaults() {
    let ws = TestWorkspace::with_settings(SETTINGS);
    std::fs::write(ws.path().join("config.yaml"), "output: log\n").unwrap();

    ws.bulker()
        .args(["groups", "list"])
        .assert()
        .success()
        .stdout("level=info group=core repos=api,web\n");

    // フラグは設定ファイルより優先される
    ws.bulker()
        .args(["groups", "list", "-o", "line"])
        .assert()
        .success()
        .stdout("core: repos=api,web\n");
}

#[test]
fn test_invalid_output_format() {
    let ws = TestWorkspace::with_settings(SETTINGS);

    ws.bulker()
        .args(["repos", "list", "-o", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be one of"));
}
