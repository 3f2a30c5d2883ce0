//! グループ操作
//!
//! グループ操作はリポジトリのワークツリーに触れないため、ランナーを
//! 経由せずにレジストリ上で直接Outcomesを組み立てる。

use crate::application::outcome::{Outcome, Outcomes};
use crate::application::record::Record;
use crate::common::error::BulkerError;
use crate::common::result::BulkerResult;
use crate::domain::entities::{MembershipChange, Registry};

/// グループごとに1件（`repos`フィールド）
pub fn list_groups(registry: &Registry) -> Outcomes {
    registry
        .groups
        .iter()
        .map(|g| Outcome::success(g.name.clone(), Record::new().with("repos", g.repos.clone())))
        .collect()
}

/// グループを作成し、指定されたリポジトリを追加する
pub fn create_group(
    registry: &mut Registry,
    group: &str,
    repo_names: &[String],
) -> BulkerResult<Outcomes> {
    registry.add_group(group)?;
    add_members(registry, group, repo_names)
}

/// リポジトリごとにメンバー追加を試みる
///
/// グループが存在しない場合はコマンド全体のエラー、未登録のリポジトリは
/// そのリポジトリのエラーとして扱う。
pub fn add_members(
    registry: &mut Registry,
    group: &str,
    repo_names: &[String],
) -> BulkerResult<Outcomes> {
    ensure_group(registry, group)?;
    Ok(repo_names
        .iter()
        .map(|name| membership_outcome(name, group, registry.add_repo_to_group(group, name)))
        .collect())
}

pub fn remove_members(
    registry: &mut Registry,
    group: &str,
    repo_names: &[String],
) -> BulkerResult<Outcomes> {
    ensure_group(registry, group)?;
    Ok(repo_names
        .iter()
        .map(|name| membership_outcome(name, group, registry.remove_repo_from_group(group, name)))
        .collect())
}

fn ensure_group(registry: &Registry, group: &str) -> BulkerResult<()> {
    if registry.groups.iter().any(|g| g.name == group) {
        Ok(())
    } else {
        Err(BulkerError::GroupNotFound(group.to_string()))
    }
}

fn membership_outcome(
    repo_name: &str,
    group: &str,
    change: BulkerResult<MembershipChange>,
) -> Outcome {
    let record = change.map(|change| Some(Record::status(change.status()).with("group", group)));
    Outcome::from_result(repo_name, record)
}
