use std::collections::BTreeMap;
use tracing::warn;

use super::record::Record;
use crate::common::error::BulkerError;
use crate::common::result::BulkerResult;

/// 1リポジトリ（またはグループ）に対する実行結果
#[derive(Debug)]
pub struct Outcome {
    /// リポジトリ名
    pub name: String,

    /// 構造化された結果（該当なしの場合はNone）
    pub result: Option<Record>,

    /// エラー
    pub error: Option<BulkerError>,
}

impl Outcome {
    pub fn new(name: impl Into<String>, result: Option<Record>, error: Option<BulkerError>) -> Self {
        Self {
            name: name.into(),
            result,
            error,
        }
    }

    /// 操作の戻り値から作成する
    pub fn from_result(name: impl Into<String>, result: BulkerResult<Option<Record>>) -> Self {
        match result {
            Ok(record) => Self::new(name, record, None),
            Err(e) => Self::new(name, None, Some(e)),
        }
    }

    pub fn success(name: impl Into<String>, record: Record) -> Self {
        Self::new(name, Some(record), None)
    }

    pub fn failure(name: impl Into<String>, error: BulkerError) -> Self {
        Self::new(name, None, Some(error))
    }

    /// 結果もエラーもない（「該当なし」）か。出力からは除外される
    pub fn is_empty(&self) -> bool {
        self.result.is_none() && self.error.is_none()
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    /// ソフトスキップ（該当なし、または status=skipped）か
    pub fn is_skipped(&self) -> bool {
        !self.is_failure() && self.result.as_ref().map_or(true, Record::is_skipped)
    }
}

/// 実行結果の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// 対象となったリポジトリ数
    pub total: usize,
    /// 成功数
    pub succeeded: usize,
    /// 失敗数
    pub failed: usize,
    /// スキップ数
    pub skipped: usize,
}

/// 名前ごとに1件のOutcomeを保持するマップ（名前順）
#[derive(Debug, Default)]
pub struct Outcomes {
    entries: BTreeMap<String, Outcome>,
}

impl Outcomes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outcomeを追加する。同名が既にある場合は最初の結果を残す
    pub fn insert(&mut self, outcome: Outcome) -> bool {
        if self.entries.contains_key(&outcome.name) {
            warn!(name = %outcome.name, "duplicate outcome ignored");
            return false;
        }
        self.entries.insert(outcome.name.clone(), outcome);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Outcome> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 全件（名前順）
    pub fn iter(&self) -> impl Iterator<Item = &Outcome> {
        self.entries.values()
    }

    /// 出力対象（結果またはエラーを持つもの、名前順）
    pub fn visible(&self) -> impl Iterator<Item = &Outcome> {
        self.entries.values().filter(|o| !o.is_empty())
    }

    pub fn failure_count(&self) -> usize {
        self.entries.values().filter(|o| o.is_failure()).count()
    }

    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            total: self.entries.len(),
            ..Default::default()
        };
        for outcome in self.entries.values() {
            if outcome.is_failure() {
                summary.failed += 1;
            } else if outcome.is_skipped() {
                summary.skipped += 1;
            } else {
                summary.succeeded += 1;
            }
        }
        summary
    }

    /// 失敗が1件でもあれば件数のみを持つエラーを返す
    pub fn check(&self) -> BulkerResult<RunSummary> {
        let summary = self.summary();
        if summary.failed > 0 {
            return Err(BulkerError::repositories_failed(summary.failed));
        }
        Ok(summary)
    }
}

impl FromIterator<Outcome> for Outcomes {
    fn from_iter<I: IntoIterator<Item = Outcome>>(iter: I) -> Self {
        let mut outcomes = Outcomes::new();
        for outcome in iter {
            outcomes.insert(outcome);
        }
        outcomes
    }
}
