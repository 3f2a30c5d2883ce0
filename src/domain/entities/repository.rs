use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// リポジトリエンティティ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// リポジトリ名（一意、ワークスペース内のディレクトリ名にもなる）
    pub name: String,

    /// クローン元のURL
    pub url: String,

    /// 選択用のタグ
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
}

impl Repository {
    /// 新しいRepositoryインスタンスを作成
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            tags: BTreeSet::new(),
        }
    }

    /// タグを設定
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// いずれかのタグを持っているか
    pub fn has_any_tag(&self, tags: &BTreeSet<String>) -> bool {
        tags.iter().any(|t| self.tags.contains(t))
    }
}

/// グループの定義
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// グループ名
    pub name: String,

    /// グループに含まれるリポジトリ名のリスト（登録済みである必要はない）
    #[serde(default)]
    pub repos: Vec<String>,
}

impl Group {
    /// 新しいGroupインスタンスを作成
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            repos: Vec::new(),
        }
    }

    /// メンバーを設定
    pub fn with_repos<I, S>(mut self, repos: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.repos = repos.into_iter().map(Into::into).collect();
        self
    }

    pub fn contains(&self, repo_name: &str) -> bool {
        self.repos.iter().any(|r| r == repo_name)
    }
}
