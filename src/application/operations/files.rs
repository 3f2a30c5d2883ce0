use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::application::context::ExecutionContext;
use crate::application::record::Record;
use crate::application::runner::{Operation, OperationResult};
use crate::common::error::BulkerError;

/// リポジトリ内のファイルをコピーする
///
/// 相対パスはリポジトリのルートから解決される。絶対パスの`source`を
/// 指定すると同じファイルを全リポジトリに配布できる。
#[derive(Debug, Clone)]
pub struct CopyFile {
    pub source: PathBuf,
    pub target: PathBuf,
}

#[async_trait]
impl Operation for CopyFile {
    async fn run(&self, ctx: ExecutionContext) -> OperationResult {
        let source = ctx.resolve(&self.source);
        if !ctx.fs.exists(&ctx.path).await || !ctx.fs.exists(&source).await {
            return Ok(None);
        }

        let target = ctx.resolve(&self.target);
        if ctx.fs.same_file(&source, &target).await {
            return Ok(Some(Record::skipped(SAME_FILE)));
        }
        let bytes = ctx.fs.copy(&source, &target).await?;
        Ok(Some(
            Record::status("copied")
                .with("target", relative(&ctx.path, &target))
                .with("bytes", bytes),
        ))
    }
}

const SAME_FILE: &str = "source and target are the same file";

/// リポジトリ内のファイルを移動・リネームする
///
/// 移動元はリポジトリ内に限る。絶対パスの`source`はエラーになる。
#[derive(Debug, Clone)]
pub struct RenameFile {
    pub source: PathBuf,
    pub target: PathBuf,
}

#[async_trait]
impl Operation for RenameFile {
    async fn run(&self, ctx: ExecutionContext) -> OperationResult {
        if self.source.is_absolute() {
            return Err(BulkerError::validation_error(
                "source",
                "rename source must be relative to the repository",
                Some(self.source.display().to_string()),
            ));
        }

        let source = ctx.resolve(&self.source);
        if !ctx.fs.exists(&ctx.path).await || !ctx.fs.exists(&source).await {
            return Ok(None);
        }

        let target = ctx.resolve(&self.target);
        if ctx.fs.same_file(&source, &target).await {
            return Ok(Some(Record::skipped(SAME_FILE)));
        }
        ctx.fs.rename(&source, &target).await?;
        Ok(Some(
            Record::status("renamed").with("target", relative(&ctx.path, &target)),
        ))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchReport {
    files: Vec<String>,
    matches: usize,
}

/// 正規表現に一致する行を含むファイルを検索する
#[derive(Debug, Clone)]
pub struct SearchFiles {
    pub pattern: Regex,
}

#[async_trait]
impl Operation for SearchFiles {
    async fn run(&self, ctx: ExecutionContext) -> OperationResult {
        if !ctx.fs.exists(&ctx.path).await {
            return Ok(None);
        }

        let mut report = SearchReport {
            files: Vec::new(),
            matches: 0,
        };
        for file in ctx.fs.walk_files(&ctx.path).await? {
            let Some(content) = read_text(&file).await else {
                continue;
            };
            let count = content.lines().filter(|l| self.pattern.is_match(l)).count();
            if count > 0 {
                report.files.push(relative(&ctx.path, &file));
                report.matches += count;
            }
        }

        if report.files.is_empty() {
            return Ok(None);
        }
        Ok(Some(Record::from_serialize(&report)?))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplaceReport {
    files: Vec<String>,
    replacements: usize,
}

/// 正規表現による置換をリポジトリ内の全ファイルに適用する
///
/// `replacement`では`$1`や`${name}`でキャプチャを参照できる。
#[derive(Debug, Clone)]
pub struct ReplaceInFiles {
    pub pattern: Regex,
    pub replacement: String,
}

#[async_trait]
impl Operation for ReplaceInFiles {
    async fn run(&self, ctx: ExecutionContext) -> OperationResult {
        if !ctx.fs.exists(&ctx.path).await {
            return Ok(None);
        }

        let mut report = ReplaceReport {
            files: Vec::new(),
            replacements: 0,
        };
        for file in ctx.fs.walk_files(&ctx.path).await? {
            let Some(content) = read_text(&file).await else {
                continue;
            };
            let count = self.pattern.find_iter(&content).count();
            if count == 0 {
                continue;
            }

            let replaced = self.pattern.replace_all(&content, self.replacement.as_str());
            if replaced != content {
                ctx.fs.write(&file, &replaced).await?;
                report.files.push(relative(&ctx.path, &file));
                report.replacements += count;
            }
        }

        if report.files.is_empty() {
            return Ok(None);
        }
        Ok(Some(Record::from_serialize(&report)?))
    }
}

/// UTF-8として読めないファイル（バイナリ等）は`None`
async fn read_text(path: &Path) -> Option<String> {
    match tokio::fs::read(path).await {
        Ok(bytes) => String::from_utf8(bytes).ok(),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "skipping unreadable file");
            None
        }
    }
}

/// 出力用のリポジトリ相対パス（区切り文字は`/`）
fn relative(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
