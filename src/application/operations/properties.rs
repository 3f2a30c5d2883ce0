use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::application::context::ExecutionContext;
use crate::application::record::Record;
use crate::application::runner::{Operation, OperationResult};
use crate::common::error::BulkerError;
use crate::common::result::BulkerResult;

/// 構造化ファイルの形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// 拡張子から判定。不明な拡張子はYAML（JSONのスーパーセット）として扱う
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// JSON/YAMLファイルからドット区切りパスで値を取り出す
///
/// 配列要素は数値のセグメントで参照する（`dependencies.0.name`）。
#[derive(Debug, Clone)]
pub struct GetProperty {
    pub file: PathBuf,
    pub path: String,
}

#[async_trait]
impl Operation for GetProperty {
    async fn run(&self, ctx: ExecutionContext) -> OperationResult {
        let file = ctx.resolve(&self.file);
        if !ctx.fs.exists(&file).await {
            return Ok(None);
        }

        let content = ctx.fs.read_to_string(&file).await?;
        let document = parse_document(&content, DocumentFormat::from_path(&file))?;
        let value = lookup(&document, &self.path)
            .ok_or_else(|| BulkerError::not_found("property", self.path.clone()))?;

        Ok(Some(Record::new().with("value", value.clone())))
    }
}

fn parse_document(content: &str, format: DocumentFormat) -> BulkerResult<Value> {
    match format {
        DocumentFormat::Json => Ok(serde_json::from_str(content)?),
        DocumentFormat::Yaml => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
            Ok(serde_json::to_value(yaml)?)
        }
    }
}

/// 空のパスはドキュメント全体を指す
fn lookup<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(document, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}
