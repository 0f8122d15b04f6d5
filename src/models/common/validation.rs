use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

/// 写入模式：POST 创建、PUT 整体替换、PATCH 部分更新
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Replace,
    Partial,
}

impl WriteMode {
    /// 是否要求提供全部必填字段
    pub fn requires_all(self) -> bool {
        !matches!(self, WriteMode::Partial)
    }
}

/// 字段级校验错误，形如 `{"title": ["This field is required."]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "api.ts")]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub const REQUIRED: &'static str = "This field is required.";
    pub const BLANK: &'static str = "This field may not be blank.";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// 外键不存在时的标准提示
    pub fn invalid_pk(field: &str, pk: impl std::fmt::Display) -> Self {
        Self::single(field, format!("Invalid pk \"{pk}\" - object does not exist."))
    }

    /// 必填字段检查
    pub fn require<T>(&mut self, field: &str, value: &Option<T>, mode: WriteMode) {
        if mode.requires_all() && value.is_none() {
            self.add(field, Self::REQUIRED);
        }
    }

    /// 标题类字段检查：非空且不超过 max_len 个字符
    pub fn check_title(&mut self, field: &str, value: &Option<String>, max_len: usize) {
        if let Some(title) = value {
            if title.trim().is_empty() {
                self.add(field, Self::BLANK);
            } else if title.chars().count() > max_len {
                self.add(
                    field,
                    format!("Ensure this field has no more than {max_len} characters."),
                );
            }
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{field}: {}", messages.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// 区分“字段缺失”与“显式 null”：缺失为 None，null 为 Some(None)
pub fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct NullableField {
        #[serde(default, deserialize_with = "deserialize_nullable")]
        value: Option<Option<i32>>,
    }

    #[test]
    fn test_nullable_distinguishes_missing_and_null() {
        let missing: NullableField = serde_json::from_str("{}").expect("parse");
        let null: NullableField = serde_json::from_str(r#"{"value": null}"#).expect("parse");
        let set: NullableField = serde_json::from_str(r#"{"value": 7}"#).expect("parse");
        assert_eq!(missing.value, None);
        assert_eq!(null.value, Some(None));
        assert_eq!(set.value, Some(Some(7)));
    }

    #[test]
    fn test_require_only_for_full_writes() {
        let mut errors = FieldErrors::new();
        errors.require::<String>("title", &None, WriteMode::Partial);
        assert!(errors.is_empty());
        errors.require::<String>("title", &None, WriteMode::Replace);
        assert!(errors.contains("title"));
    }

    #[test]
    fn test_check_title() {
        let mut errors = FieldErrors::new();
        errors.check_title("title", &Some("   ".to_string()), 255);
        errors.check_title("other", &Some("x".repeat(256)), 255);
        errors.check_title("fine", &Some("Intro".to_string()), 255);
        assert!(errors.contains("title"));
        assert!(errors.contains("other"));
        assert!(!errors.contains("fine"));
    }

    #[test]
    fn test_serializes_as_map() {
        let errors = FieldErrors::invalid_pk("task", 99);
        let json = serde_json::to_value(&errors).expect("serialize");
        assert_eq!(
            json["task"][0],
            serde_json::json!("Invalid pk \"99\" - object does not exist.")
        );
    }
}
