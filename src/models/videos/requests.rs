use serde::Deserialize;
use ts_rs::TS;

use crate::models::topics::requests::TITLE_MAX_LEN;
use crate::models::{FieldErrors, WriteMode};

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "video.ts")]
pub struct VideoPayload {
    #[serde(alias = "topic")]
    pub topic_id: Option<i64>,
    pub title: Option<String>,
    pub video_file: Option<String>,
}

impl VideoPayload {
    pub fn validate(&self, mode: WriteMode) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("topic", &self.topic_id, mode);
        errors.require("title", &self.title, mode);
        errors.require("video_file", &self.video_file, mode);
        errors.check_title("title", &self.title, TITLE_MAX_LEN);
        if let Some(file) = &self.video_file
            && file.trim().is_empty()
        {
            errors.add("video_file", FieldErrors::BLANK);
        }
        errors.into_result()
    }

    pub fn into_new(self) -> NewVideo {
        NewVideo {
            topic_id: self.topic_id.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            video_file: self.video_file.unwrap_or_default(),
        }
    }

    pub fn into_changes(self) -> VideoChanges {
        VideoChanges {
            topic_id: self.topic_id,
            title: self.title,
            video_file: self.video_file,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewVideo {
    pub topic_id: i64,
    pub title: String,
    pub video_file: String,
}

#[derive(Debug, Clone, Default)]
pub struct VideoChanges {
    pub topic_id: Option<i64>,
    pub title: Option<String>,
    pub video_file: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "video.ts")]
pub struct VideoListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    #[serde(alias = "topic")]
    pub topic_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_reports_every_missing_field() {
        let errors = VideoPayload::default()
            .validate(WriteMode::Create)
            .expect_err("fields are required");
        assert!(errors.contains("topic"));
        assert!(errors.contains("title"));
        assert!(errors.contains("video_file"));
    }

    #[test]
    fn test_topic_alias() {
        let payload: VideoPayload =
            serde_json::from_str(r#"{"topic": 3, "title": "Intro", "video_file": "abc"}"#)
                .expect("parse");
        assert_eq!(payload.topic_id, Some(3));
        assert!(payload.validate(WriteMode::Create).is_ok());
    }
}
