use serde::Deserialize;
use serde_json::Value;
use ts_rs::TS;

use crate::models::common::validation::deserialize_nullable;
use crate::models::{FieldErrors, WriteMode};

/// 提交写入请求
///
/// `user_id` 与 `grade` 以原始 JSON 保留，反序列化阶段不做类型检查：
/// `user_id` 永不生效，`grade` 仅在字段掩码允许后才解析。
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct SubmissionPayload {
    #[serde(alias = "task")]
    pub task_id: Option<i64>,
    pub file: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[ts(optional, type = "number | null")]
    pub grade: Option<Option<Value>>,
    #[serde(default, alias = "user")]
    #[ts(optional, type = "unknown")]
    pub user_id: Option<Value>,
}

impl SubmissionPayload {
    pub fn validate(&self, mode: WriteMode) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("task", &self.task_id, mode);
        errors.require("file", &self.file, mode);
        if let Some(file) = &self.file
            && file.trim().is_empty()
        {
            errors.add("file", FieldErrors::BLANK);
        }
        errors.into_result()
    }
}

pub const GRADE_INVALID: &str = "A valid integer is required.";
pub const GRADE_TOO_LARGE: &str = "Ensure this value is less than or equal to 2147483647.";
pub const GRADE_TOO_SMALL: &str = "Ensure this value is greater than or equal to -2147483648.";

/// 解析成绩字段：接受整数或整数字符串
pub fn parse_grade(value: &Value) -> Result<i32, &'static str> {
    let wide = match value {
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(v), _) => v,
            (None, Some(f)) if f.fract() == 0.0 && f.is_finite() => {
                if f > i32::MAX as f64 {
                    return Err(GRADE_TOO_LARGE);
                }
                if f < i32::MIN as f64 {
                    return Err(GRADE_TOO_SMALL);
                }
                f as i64
            }
            _ => return Err(GRADE_INVALID),
        },
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| GRADE_INVALID)?,
        _ => return Err(GRADE_INVALID),
    };
    if wide > i64::from(i32::MAX) {
        Err(GRADE_TOO_LARGE)
    } else if wide < i64::from(i32::MIN) {
        Err(GRADE_TOO_SMALL)
    } else {
        Ok(wide as i32)
    }
}

/// 经策略裁剪后的有效写入集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionWrite {
    /// 仅创建时存在，恒为调用者 ID
    pub owner_id: Option<i64>,
    pub task_id: Option<i64>,
    pub file: Option<String>,
    pub grade: Option<Option<i32>>,
}

impl SubmissionWrite {
    pub fn into_new(self) -> Option<NewSubmission> {
        Some(NewSubmission {
            task_id: self.task_id?,
            user_id: self.owner_id?,
            file: self.file?,
        })
    }

    pub fn into_changes(self) -> SubmissionChanges {
        SubmissionChanges {
            task_id: self.task_id,
            file: self.file,
            grade: self.grade,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    pub task_id: i64,
    pub user_id: i64,
    pub file: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionChanges {
    pub task_id: Option<i64>,
    pub file: Option<String>,
    pub grade: Option<Option<i32>>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct SubmissionListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    #[serde(alias = "task")]
    pub task_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_aliases() {
        let payload: SubmissionPayload =
            serde_json::from_str(r#"{"task": 42, "file": "tok", "user": 1, "grade": 100}"#)
                .expect("parse");
        assert_eq!(payload.task_id, Some(42));
        assert_eq!(payload.user_id, Some(Value::from(1)));
        assert_eq!(payload.grade, Some(Some(Value::from(100))));
    }

    #[test]
    fn test_masked_fields_accept_any_json() {
        let payload: SubmissionPayload = serde_json::from_str(
            r#"{"task": 1, "file": "tok", "user": "someone-else", "grade": "A+"}"#,
        )
        .expect("raw fields never fail to parse");
        assert_eq!(payload.grade, Some(Some(Value::from("A+"))));

        let cleared: SubmissionPayload =
            serde_json::from_str(r#"{"grade": null}"#).expect("parse");
        assert_eq!(cleared.grade, Some(None));
    }

    #[test]
    fn test_parse_grade() {
        assert_eq!(parse_grade(&Value::from(90)), Ok(90));
        assert_eq!(parse_grade(&Value::from(" 75 ")), Ok(75));
        assert_eq!(parse_grade(&Value::from("A+")), Err(GRADE_INVALID));
        assert_eq!(parse_grade(&Value::from(99_999_999_999_i64)), Err(GRADE_TOO_LARGE));
        assert_eq!(parse_grade(&Value::from(-99_999_999_999_i64)), Err(GRADE_TOO_SMALL));
        assert_eq!(parse_grade(&Value::from(1.5)), Err(GRADE_INVALID));
        assert_eq!(parse_grade(&Value::Bool(true)), Err(GRADE_INVALID));
    }

    #[test]
    fn test_create_requires_task_and_file() {
        let errors = SubmissionPayload::default()
            .validate(WriteMode::Create)
            .expect_err("required");
        assert!(errors.contains("task"));
        assert!(errors.contains("file"));
    }

    #[test]
    fn test_into_new_needs_owner() {
        let write = SubmissionWrite {
            owner_id: None,
            task_id: Some(1),
            file: Some("tok".into()),
            grade: None,
        };
        assert!(write.into_new().is_none());
    }
}
