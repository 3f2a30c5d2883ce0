use std::path::PathBuf;

use crate::common::error::BulkerError;
use crate::common::result::BulkerResult;
use crate::domain::value_objects::{OutputFormat, RunMode};
use crate::infrastructure::store::{self, settings_store::SETTINGS_FILE, ConfigFile};

/// 実行時の設定（CLIフラグ > 環境変数 > 設定ファイル > デフォルト）
///
/// ランナーのコンストラクタに渡され、各ExecutionContextから参照される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// 出力形式
    pub output: OutputFormat,

    /// 実行モード
    pub mode: RunMode,

    /// リポジトリ／グループ設定ファイルのパス
    pub settings: PathBuf,

    /// リポジトリをクローンするディレクトリ
    pub workspace: PathBuf,

    /// 並列実行時に進捗バーを表示するか
    pub progress: bool,
}

/// CLIフラグ・環境変数から渡される上書き値
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub output: Option<OutputFormat>,
    pub mode: Option<RunMode>,
    pub settings: Option<PathBuf>,
    pub workspace: Option<PathBuf>,
    pub progress: Option<bool>,
}

impl AppConfig {
    /// 指定ワークスペース向けのデフォルト設定
    pub fn for_workspace(workspace: impl Into<PathBuf>) -> Self {
        Self {
            output: OutputFormat::default(),
            mode: RunMode::default(),
            settings: store::default_path(SETTINGS_FILE),
            workspace: workspace.into(),
            progress: true,
        }
    }

    /// 設定ファイルの値と上書き値を統合する
    pub fn resolve(file: ConfigFile, overrides: ConfigOverrides) -> BulkerResult<Self> {
        let workspace = match overrides.workspace.or(file.workspace) {
            Some(dir) => dir,
            None => std::env::current_dir().map_err(|e| {
                BulkerError::config_error_with_source("cannot determine current directory", e)
            })?,
        };

        Ok(Self {
            output: overrides.output.or(file.output).unwrap_or_default(),
            mode: overrides.mode.or(file.mode).unwrap_or_default(),
            settings: overrides
                .settings
                .or(file.settings)
                .unwrap_or_else(|| store::default_path(SETTINGS_FILE)),
            workspace,
            progress: overrides.progress.or(file.progress).unwrap_or(true),
        })
    }

    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_settings(mut self, settings: impl Into<PathBuf>) -> Self {
        self.settings = settings.into();
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }
}
