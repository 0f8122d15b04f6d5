use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::validation::deserialize_nullable;
use crate::models::topics::requests::TITLE_MAX_LEN;
use crate::models::{FieldErrors, WriteMode};

// creator / created_at 为只读字段，不在请求体中声明
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "task.ts")]
pub struct TaskPayload {
    #[serde(alias = "topic")]
    pub topic_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[ts(optional, type = "string | null")]
    pub attachment: Option<Option<String>>,
}

impl TaskPayload {
    pub fn validate(&self, mode: WriteMode) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("topic", &self.topic_id, mode);
        errors.require("title", &self.title, mode);
        errors.check_title("title", &self.title, TITLE_MAX_LEN);
        errors.into_result()
    }

    /// 附件 token（若请求中设置了非空附件）
    pub fn attachment_token(&self) -> Option<&str> {
        self.attachment
            .as_ref()
            .and_then(|a| a.as_deref())
            .filter(|a| !a.is_empty())
    }

    pub fn into_new(self, creator_id: i64) -> NewTask {
        NewTask {
            topic_id: self.topic_id.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            attachment: self.attachment.flatten().filter(|a| !a.is_empty()),
            creator_id,
        }
    }

    pub fn into_changes(self) -> TaskChanges {
        TaskChanges {
            topic_id: self.topic_id,
            title: self.title,
            description: self.description,
            attachment: self
                .attachment
                .map(|a| a.filter(|token| !token.is_empty())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub topic_id: i64,
    pub title: String,
    pub description: String,
    pub attachment: Option<String>,
    pub creator_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub topic_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub attachment: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "task.ts")]
pub struct TaskListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    #[serde(alias = "topic")]
    pub topic_id: Option<i64>,
    #[serde(alias = "creator")]
    pub creator_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creator_in_payload_is_ignored() {
        let payload: TaskPayload = serde_json::from_str(
            r#"{"topic": 1, "title": "Lab 1", "creator": 99, "created_at": "2020-01-01"}"#,
        )
        .expect("parse");
        let task = payload.into_new(5);
        assert_eq!(task.creator_id, 5);
        assert_eq!(task.description, "");
    }

    #[test]
    fn test_attachment_can_be_cleared() {
        let payload: TaskPayload =
            serde_json::from_str(r#"{"attachment": null}"#).expect("parse");
        assert_eq!(payload.into_changes().attachment, Some(None));

        let untouched: TaskPayload = serde_json::from_str("{}").expect("parse");
        assert_eq!(untouched.into_changes().attachment, None);
    }
}
