use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::config::AppConfig;
use crate::domain::entities::Repository;
use crate::infrastructure::{FileSystem, Git, Shell};

/// 1回の操作呼び出しに渡される実行コンテキスト
///
/// リポジトリごとに新しく作成され、共有・再利用されない。
/// ファイルシステムとシェルはステートレスなので全タスクで共有する。
pub struct ExecutionContext {
    /// ワークスペースのファイルシステム
    pub fs: Arc<FileSystem>,

    /// 対象リポジトリ
    pub repo: Repository,

    /// リポジトリのディスク上のパス
    pub path: PathBuf,

    /// 外部コマンド実行
    pub shell: Arc<dyn Shell>,

    /// コマンドラインの位置引数
    pub args: Vec<String>,

    /// 実行時設定
    pub config: Arc<AppConfig>,
}

impl ExecutionContext {
    /// リポジトリ作業ディレクトリ向けのgitラッパー
    pub fn git(&self) -> Git<'_> {
        Git::new(self.shell.as_ref(), &self.path)
    }

    /// リポジトリ内の相対パスを解決する
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.path.join(relative)
    }

    /// クローン済みか（`.git`の存在で判定）
    pub async fn is_cloned(&self) -> bool {
        self.fs.exists(&self.path.join(".git")).await
    }
}

/// リポジトリごとのExecutionContextを組み立てる
#[derive(Clone)]
pub struct ContextBuilder {
    fs: Arc<FileSystem>,
    shell: Arc<dyn Shell>,
    args: Vec<String>,
    config: Arc<AppConfig>,
}

impl ContextBuilder {
    pub fn new(config: Arc<AppConfig>, shell: Arc<dyn Shell>, args: Vec<String>) -> Self {
        Self {
            fs: Arc::new(FileSystem::new(config.workspace.clone())),
            shell,
            args,
            config,
        }
    }

    pub fn build(&self, repo: &Repository) -> ExecutionContext {
        ExecutionContext {
            fs: Arc::clone(&self.fs),
            repo: repo.clone(),
            path: self.fs.repo_path(&repo.name),
            shell: Arc::clone(&self.shell),
            args: self.args.clone(),
            config: Arc::clone(&self.config),
        }
    }
}
