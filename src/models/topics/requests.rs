use serde::Deserialize;
use ts_rs::TS;

use crate::models::{FieldErrors, WriteMode};

pub const TITLE_MAX_LEN: usize = 255;

// 主题写入请求（POST / PUT / PATCH 共用）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "topic.ts")]
pub struct TopicPayload {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl TopicPayload {
    pub fn validate(&self, mode: WriteMode) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("title", &self.title, mode);
        errors.check_title("title", &self.title, TITLE_MAX_LEN);
        errors.into_result()
    }

    /// 仅在 validate(Create) 通过后调用
    pub fn into_new(self) -> NewTopic {
        NewTopic {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
        }
    }

    pub fn into_changes(self) -> TopicChanges {
        TopicChanges {
            title: self.title,
            description: self.description,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewTopic {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct TopicChanges {
    pub title: Option<String>,
    pub description: Option<String>,
}

// 主题列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "topic.ts")]
pub struct TopicListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
}
