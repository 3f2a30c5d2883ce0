use serde::Serialize;
use serde_json::Value;

use crate::common::result::BulkerResult;

/// Field carrying the soft-skip marker
pub const STATUS_FIELD: &str = "status";
pub const SKIPPED: &str = "skipped";

/// Structured result of one operation: an ordered list of `(key, value)` pairs.
///
/// Renderers only ever see records, so operations choose their own shape
/// without the output layer inspecting concrete types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, replacing the value of an existing key in place
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Soft "nothing to do" result, reported distinctly from success and failure
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::new().with(STATUS_FIELD, SKIPPED).with("reason", reason.into())
    }

    pub fn status(status: &str) -> Self {
        Self::new().with(STATUS_FIELD, status)
    }

    /// Projects a serializable value.
    ///
    /// Struct fields are taken by their serialized names (result structs use
    /// `rename_all = "camelCase"`), map entries by their keys. Anything that
    /// is not an object becomes a single `value` field.
    pub fn from_serialize<T: Serialize>(value: &T) -> BulkerResult<Self> {
        Ok(Self::from_value(serde_json::to_value(value)?))
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self {
                fields: map.into_iter().collect(),
            },
            Value::Null => Self::new(),
            other => Self::new().with("value", other),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.get(STATUS_FIELD), Some(Value::String(s)) if s == SKIPPED)
    }
}

/// Plain-text form of a field value: strings unquoted, lists comma-joined
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct BranchInfo {
        current_branch: String,
        is_clean: bool,
    }

    #[test]
    fn test_struct_fields_are_camel_case_in_order() {
        let record = Record::from_serialize(&BranchInfo {
            current_branch: "main".to_string(),
            is_clean: true,
        })
        .unwrap();
        let keys: Vec<_> = record.keys().collect();
        assert_eq!(keys, vec!["currentBranch", "isClean"]);
        assert_eq!(record.get("isClean"), Some(&json!(true)));
    }

    #[test]
    fn test_map_keys_are_kept() {
        let mut map = BTreeMap::new();
        map.insert("Some Key", 1);
        map.insert("another", 2);
        let record = Record::from_serialize(&map).unwrap();
        let keys: Vec<_> = record.keys().collect();
        assert_eq!(keys, vec!["Some Key", "another"]);
    }

    #[test]
    fn test_scalar_becomes_value_field() {
        let record = Record::from_value(json!("1.2.3"));
        assert_eq!(record.fields(), &[("value".to_string(), json!("1.2.3"))]);
        assert!(Record::from_value(Value::Null).is_empty());
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let record = Record::new().with("a", 1).with("b", 2).with("a", 3);
        assert_eq!(record.fields(), &[("a".to_string(), json!(3)), ("b".to_string(), json!(2))]);
    }

    #[test]
    fn test_skipped() {
        assert!(Record::skipped("already cloned").is_skipped());
        assert!(!Record::status("cloned").is_skipped());
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("x")), "x");
        assert_eq!(display_value(&json!(["a", "b"])), "a,b");
        assert_eq!(display_value(&json!(3)), "3");
        assert_eq!(display_value(&Value::Null), "");
    }
}
