use serde::{Deserialize, Serialize};

use super::repository::{Group, Repository};
use crate::common::error::BulkerError;
use crate::common::result::{BulkerResult, OptionExt};

/// グループのメンバー変更結果
///
/// 既に追加済み／削除済みの場合はエラーではなくソフトスキップとして扱う。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    Added,
    AlreadyAdded,
    Removed,
    AlreadyRemoved,
}

impl MembershipChange {
    /// 変更が発生しなかったか
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::AlreadyAdded | Self::AlreadyRemoved)
    }

    /// 出力用のステータス文字列
    pub fn status(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::AlreadyAdded | Self::AlreadyRemoved => "skipped",
        }
    }
}

/// 設定ファイルに保存されるリポジトリとグループの一覧
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    /// 登録済みリポジトリ（名前順）
    #[serde(default)]
    pub repos: Vec<Repository>,

    /// グループ定義（名前順）
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl Registry {
    /// 新しいRegistryインスタンスを作成
    pub fn new(repos: Vec<Repository>, groups: Vec<Group>) -> Self {
        Self { repos, groups }
    }

    /// リポジトリを追加する
    pub fn add_repo(&mut self, repo: Repository) -> BulkerResult<()> {
        if repo.name.trim().is_empty() {
            return Err(BulkerError::validation_error(
                "name",
                "repository name must not be empty",
                Some(repo.name),
            ));
        }
        if self.repos.iter().any(|r| r.name == repo.name) {
            return Err(BulkerError::already_exists("repository", repo.name));
        }

        self.repos.push(repo);
        self.repos.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(())
    }

    /// リポジトリを削除する（重複がある場合は最後の一件）
    pub fn remove_repo(&mut self, name: &str) -> BulkerResult<Repository> {
        let index = self
            .repos
            .iter()
            .rposition(|r| r.name == name)
            .ok_or_not_found("repository", name)?;
        Ok(self.repos.remove(index))
    }

    pub fn get_repo(&self, name: &str) -> BulkerResult<&Repository> {
        self.repos
            .iter()
            .find(|r| r.name == name)
            .ok_or_not_found("repository", name)
    }

    pub fn get_group(&self, name: &str) -> BulkerResult<&Group> {
        self.groups
            .iter()
            .find(|g| g.name == name)
            .ok_or_not_found("group", name)
    }

    /// グループを追加する
    pub fn add_group(&mut self, name: &str) -> BulkerResult<()> {
        if name.trim().is_empty() {
            return Err(BulkerError::validation_error(
                "group",
                "group name must not be empty",
                Some(name.to_string()),
            ));
        }
        if self.groups.iter().any(|g| g.name == name) {
            return Err(BulkerError::already_exists("group", name));
        }

        self.groups.push(Group::new(name));
        self.groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(())
    }

    /// グループを削除する
    pub fn remove_group(&mut self, name: &str) -> BulkerResult<Group> {
        let index = self
            .groups
            .iter()
            .position(|g| g.name == name)
            .ok_or_not_found("group", name)?;
        Ok(self.groups.remove(index))
    }

    /// グループにリポジトリを追加する
    pub fn add_repo_to_group(&mut self, group: &str, repo_name: &str) -> BulkerResult<MembershipChange> {
        let registered = self.repos.iter().any(|r| r.name == repo_name);
        let group = self.group_mut(group)?;

        if !registered {
            return Err(BulkerError::RepoNotSupported(repo_name.to_string()));
        }
        if group.contains(repo_name) {
            return Ok(MembershipChange::AlreadyAdded);
        }

        group.repos.push(repo_name.to_string());
        Ok(MembershipChange::Added)
    }

    /// グループからリポジトリを削除する
    pub fn remove_repo_from_group(
        &mut self,
        group: &str,
        repo_name: &str,
    ) -> BulkerResult<MembershipChange> {
        let group = self.group_mut(group)?;

        match group.repos.iter().position(|r| r == repo_name) {
            Some(index) => {
                group.repos.remove(index);
                Ok(MembershipChange::Removed)
            }
            None => Ok(MembershipChange::AlreadyRemoved),
        }
    }

    /// 指定グループのメンバー名を重複なしで列挙する（未知のグループはエラー）
    pub fn group_members(&self, groups: &[String]) -> BulkerResult<Vec<String>> {
        let mut members: Vec<String> = Vec::new();
        for name in groups {
            let group = self
                .groups
                .iter()
                .find(|g| &g.name == name)
                .ok_or_else(|| BulkerError::GroupNotFound(name.clone()))?;
            for repo in &group.repos {
                if !members.contains(repo) {
                    members.push(repo.clone());
                }
            }
        }
        Ok(members)
    }

    fn group_mut(&mut self, name: &str) -> BulkerResult<&mut Group> {
        self.groups
            .iter_mut()
            .find(|g| g.name == name)
            .ok_or_else(|| BulkerError::GroupNotFound(name.to_string()))
    }
}
