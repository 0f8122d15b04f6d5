use std::fmt;

use crate::errors::CourseHubError;

/// 动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Read,
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn is_write(self) -> bool {
        matches!(self, Action::Create | Action::Update | Action::Delete)
    }
}

/// 提交实例的归属
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ownership {
    pub owner_id: i64,
}

/// 文件实例信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileTarget {
    pub uploader_id: i64,
    /// 是否被视频或任务引用（课程目录公开内容）
    pub attached_to_catalog: bool,
}

/// 被访问的资源；实例级动作需要带上目标信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Topic,
    /// 主题下的视频 / 任务嵌套视图
    TopicContents,
    Video,
    Task,
    Submission(Option<Ownership>),
    File(Option<FileTarget>),
    /// 目标用户 ID
    UserAccount(Option<i64>),
    ApiSchema,
}

/// 提交中可写的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionField {
    Task,
    File,
    Grade,
}

impl SubmissionField {
    fn bit(self) -> u8 {
        match self {
            SubmissionField::Task => 0b001,
            SubmissionField::File => 0b010,
            SubmissionField::Grade => 0b100,
        }
    }
}

/// 允许写入的字段集合
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FieldMask(u8);

impl FieldMask {
    /// 创建：task + file（成绩在创建时始终只读）
    pub const CREATE: FieldMask = FieldMask(0b011);
    /// 本人更新：task + file
    pub const OWNER_UPDATE: FieldMask = FieldMask(0b011);
    /// 教职人员更新：task + file + grade
    pub const STAFF_UPDATE: FieldMask = FieldMask(0b111);

    pub fn allows(self, field: SubmissionField) -> bool {
        self.0 & field.bit() != 0
    }
}

impl fmt::Debug for FieldMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<SubmissionField> = [
            SubmissionField::Task,
            SubmissionField::File,
            SubmissionField::Grade,
        ]
        .into_iter()
        .filter(|field| self.allows(*field))
        .collect();
        f.debug_tuple("FieldMask").field(&fields).finish()
    }
}

/// 拒绝原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    AuthenticationRequired,
    Forbidden(&'static str),
}

impl DenyReason {
    pub fn message(&self) -> &'static str {
        match self {
            DenyReason::AuthenticationRequired => {
                "Authentication credentials were not provided."
            }
            DenyReason::Forbidden(msg) => msg,
        }
    }
}

impl From<DenyReason> for CourseHubError {
    fn from(reason: DenyReason) -> Self {
        match reason {
            DenyReason::AuthenticationRequired => CourseHubError::authentication(reason.message()),
            DenyReason::Forbidden(msg) => CourseHubError::authorization(msg),
        }
    }
}

/// 授权结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    AllowWithFieldMask(FieldMask),
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Decision::Deny(_))
    }

    pub fn field_mask(&self) -> Option<FieldMask> {
        match self {
            Decision::AllowWithFieldMask(mask) => Some(*mask),
            _ => None,
        }
    }

    /// 允许时返回字段掩码（若有），拒绝时返回原因
    pub fn into_result(self) -> Result<Option<FieldMask>, DenyReason> {
        match self {
            Decision::Allow => Ok(None),
            Decision::AllowWithFieldMask(mask) => Ok(Some(mask)),
            Decision::Deny(reason) => Err(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_field_masks() {
        assert!(FieldMask::STAFF_UPDATE.allows(SubmissionField::Grade));
        assert!(!FieldMask::OWNER_UPDATE.allows(SubmissionField::Grade));
        assert!(!FieldMask::CREATE.allows(SubmissionField::Grade));
        assert!(FieldMask::CREATE.allows(SubmissionField::Task));
        assert!(FieldMask::OWNER_UPDATE.allows(SubmissionField::File));
    }

    #[test]
    fn test_deny_reason_maps_to_status() {
        let unauthenticated: CourseHubError = DenyReason::AuthenticationRequired.into();
        let forbidden: CourseHubError = DenyReason::Forbidden("nope").into();
        assert_eq!(unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(forbidden.message(), "nope");
    }

    #[test]
    fn test_decision_into_result() {
        assert_eq!(Decision::Allow.into_result(), Ok(None));
        assert_eq!(
            Decision::AllowWithFieldMask(FieldMask::CREATE).into_result(),
            Ok(Some(FieldMask::CREATE))
        );
        assert!(Decision::Deny(DenyReason::AuthenticationRequired)
            .into_result()
            .is_err());
    }
}
