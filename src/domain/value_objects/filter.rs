use std::collections::BTreeSet;

use crate::domain::entities::repository::Repository;

/// 名前・タグによるリポジトリ選択
///
/// 空のセレクタは「全て」にマッチする。ただしグループで絞り込んだ場合は
/// メンバーが空でも名前による制限が有効になる。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoFilter {
    names: BTreeSet<String>,
    tags: BTreeSet<String>,
    by_group: bool,
}

impl RepoFilter {
    /// 新しいRepoFilterインスタンスを作成
    pub fn new<N, T>(names: N, tags: T) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            tags: tags.into_iter().map(Into::into).collect(),
            by_group: false,
        }
    }

    /// グループのメンバー名を名前セレクタに加える
    pub fn with_group_members<I>(mut self, members: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.names.extend(members.into_iter().map(Into::into));
        self.by_group = true;
        self
    }

    /// 全てのリポジトリにマッチするフィルタ
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, repo: &Repository) -> bool {
        let name_ok =
            (self.names.is_empty() && !self.by_group) || self.names.contains(&repo.name);
        let tag_ok = self.tags.is_empty() || repo.has_any_tag(&self.tags);
        name_ok && tag_ok
    }

    /// レジストリ順を保ったまま対象リポジトリを抽出する
    pub fn select<'a>(&self, repos: &'a [Repository]) -> Vec<&'a Repository> {
        repos.iter().filter(|r| self.matches(r)).collect()
    }
}
