use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::application::context::ExecutionContext;
use crate::application::record::Record;
use crate::application::runner::{Operation, OperationResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RepoEntry<'a> {
    url: &'a str,
    tags: &'a BTreeSet<String>,
}

/// 選択されたリポジトリの登録内容を表示する
#[derive(Debug, Clone, Copy, Default)]
pub struct ListRepos;

#[async_trait]
impl Operation for ListRepos {
    async fn run(&self, ctx: ExecutionContext) -> OperationResult {
        let entry = RepoEntry {
            url: &ctx.repo.url,
            tags: &ctx.repo.tags,
        };
        Ok(Some(Record::from_serialize(&entry)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::AppConfig;
    use crate::application::context::ContextBuilder;
    use crate::domain::entities::Repository;
    use crate::infrastructure::ProcessShell;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_list_repo_entry() {
        let config = Arc::new(AppConfig::for_workspace("/work"));
        let repo = Repository::new("api", "git@example.com:org/api.git").with_tags(["core", "backend"]);
        let ctx = ContextBuilder::new(config, Arc::new(ProcessShell::new()), Vec::new()).build(&repo);

        let record = ListRepos.run(ctx).await.unwrap().unwrap();
        assert_eq!(record.get("url"), Some(&json!("git@example.com:org/api.git")));
        assert_eq!(record.get("tags"), Some(&json!(["backend", "core"])));
    }
}
