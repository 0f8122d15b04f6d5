use super::caller::Caller;
use super::decision::{
    Action, Decision, DenyReason, FieldMask, FileTarget, Ownership, Resource, SubmissionField,
};
use crate::models::FieldErrors;
use crate::models::submissions::requests::{SubmissionPayload, SubmissionWrite, parse_grade};

const STAFF_ONLY: &str = "You do not have permission to perform this action.";
const NOT_OWNER: &str = "You can only access your own submissions.";
const NOT_UPLOADER: &str = "You do not have permission to access this file.";
const NOT_SELF: &str = "You can only access your own account.";
const SUPERUSER_ONLY: &str = "Only superusers can change account privileges.";
const UNSUPPORTED: &str = "This action is not supported for this resource.";
const TARGET_REQUIRED: &str = "This action requires a target resource.";

/// 提交列表的可见范围，作为查询条件在分页之前应用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionScope {
    All,
    OwnedBy(i64),
}

impl SubmissionScope {
    pub fn includes(&self, owner_id: i64) -> bool {
        match self {
            SubmissionScope::All => true,
            SubmissionScope::OwnedBy(id) => *id == owner_id,
        }
    }
}

pub struct AccessPolicy;

impl AccessPolicy {
    /// 授权判定
    pub fn authorize(caller: &Caller, resource: &Resource, action: Action) -> Decision {
        match resource {
            Resource::Topic | Resource::Video | Resource::Task => Self::catalog(caller, action),
            Resource::TopicContents => Self::authenticated_read(caller, action),
            Resource::Submission(target) => Self::submission(caller, target.as_ref(), action),
            Resource::File(target) => Self::file(caller, target.as_ref(), action),
            Resource::UserAccount(target) => Self::user_account(caller, *target, action),
            Resource::ApiSchema => Self::authenticated_read(caller, action),
        }
    }

    /// 提交列表的可见范围；匿名调用者无范围
    pub fn submission_scope(caller: &Caller) -> Result<SubmissionScope, DenyReason> {
        match caller {
            Caller::Anonymous => Err(DenyReason::AuthenticationRequired),
            Caller::Authenticated { is_staff: true, .. } => Ok(SubmissionScope::All),
            Caller::Authenticated { user_id, .. } => Ok(SubmissionScope::OwnedBy(*user_id)),
        }
    }

    /// 按字段掩码裁剪提交写入
    ///
    /// 请求体中的 `user_id` 一律忽略；创建时所有者绑定为调用者。
    /// 掩码外的字段（如非教职人员提交的 `grade`）被静默丢弃，不做任何校验；
    /// 只有掩码内的 `grade` 才会被解析，解析失败返回字段错误。
    pub fn narrow_submission_write(
        caller: &Caller,
        mask: FieldMask,
        action: Action,
        payload: SubmissionPayload,
    ) -> Result<SubmissionWrite, FieldErrors> {
        let owner_id = match action {
            Action::Create => caller.user_id(),
            _ => None,
        };

        let grade = match payload.grade.filter(|_| mask.allows(SubmissionField::Grade)) {
            None => None,
            Some(None) => Some(None),
            Some(Some(raw)) => match parse_grade(&raw) {
                Ok(grade) => Some(Some(grade)),
                Err(message) => return Err(FieldErrors::single("grade", message)),
            },
        };

        Ok(SubmissionWrite {
            owner_id,
            task_id: payload
                .task_id
                .filter(|_| mask.allows(SubmissionField::Task)),
            file: payload.file.filter(|_| mask.allows(SubmissionField::File)),
            grade,
        })
    }

    // 课程目录：读公开，写仅限教职人员
    fn catalog(caller: &Caller, action: Action) -> Decision {
        match action {
            Action::List | Action::Read => Decision::Allow,
            _ => Self::require_staff(caller),
        }
    }

    fn authenticated_read(caller: &Caller, action: Action) -> Decision {
        if !caller.is_authenticated() {
            return Decision::Deny(DenyReason::AuthenticationRequired);
        }
        match action {
            Action::List | Action::Read => Decision::Allow,
            _ => Decision::Deny(DenyReason::Forbidden(UNSUPPORTED)),
        }
    }

    fn submission(caller: &Caller, target: Option<&Ownership>, action: Action) -> Decision {
        if !caller.is_authenticated() {
            return Decision::Deny(DenyReason::AuthenticationRequired);
        }

        match action {
            Action::List => Decision::Allow,
            Action::Create => Decision::AllowWithFieldMask(FieldMask::CREATE),
            Action::Read | Action::Update | Action::Delete => {
                let Some(ownership) = target else {
                    return Decision::Deny(DenyReason::Forbidden(TARGET_REQUIRED));
                };
                let is_owner = caller.is(ownership.owner_id);

                match (action, caller.is_staff(), is_owner) {
                    (Action::Update, true, _) => {
                        Decision::AllowWithFieldMask(FieldMask::STAFF_UPDATE)
                    }
                    (Action::Update, false, true) => {
                        Decision::AllowWithFieldMask(FieldMask::OWNER_UPDATE)
                    }
                    (_, true, _) | (_, _, true) => Decision::Allow,
                    _ => Decision::Deny(DenyReason::Forbidden(NOT_OWNER)),
                }
            }
        }
    }

    fn file(caller: &Caller, target: Option<&FileTarget>, action: Action) -> Decision {
        if !caller.is_authenticated() {
            return Decision::Deny(DenyReason::AuthenticationRequired);
        }

        match action {
            Action::Create => Decision::Allow,
            Action::Read => {
                let Some(file) = target else {
                    return Decision::Deny(DenyReason::Forbidden(TARGET_REQUIRED));
                };
                if caller.is_staff() || caller.is(file.uploader_id) || file.attached_to_catalog {
                    Decision::Allow
                } else {
                    Decision::Deny(DenyReason::Forbidden(NOT_UPLOADER))
                }
            }
            _ => Decision::Deny(DenyReason::Forbidden(UNSUPPORTED)),
        }
    }

    fn user_account(caller: &Caller, target: Option<i64>, action: Action) -> Decision {
        if !caller.is_authenticated() {
            return Decision::Deny(DenyReason::AuthenticationRequired);
        }

        match action {
            Action::List => Self::require_staff(caller),
            Action::Read => match target {
                Some(id) if caller.is(id) || caller.is_staff() => Decision::Allow,
                Some(_) => Decision::Deny(DenyReason::Forbidden(NOT_SELF)),
                None => Decision::Deny(DenyReason::Forbidden(TARGET_REQUIRED)),
            },
            Action::Update => {
                if caller.is_superuser() {
                    Decision::Allow
                } else {
                    Decision::Deny(DenyReason::Forbidden(SUPERUSER_ONLY))
                }
            }
            Action::Create | Action::Delete => Decision::Deny(DenyReason::Forbidden(UNSUPPORTED)),
        }
    }

    fn require_staff(caller: &Caller) -> Decision {
        match caller {
            Caller::Anonymous => Decision::Deny(DenyReason::AuthenticationRequired),
            Caller::Authenticated { is_staff: true, .. } => Decision::Allow,
            Caller::Authenticated { .. } => Decision::Deny(DenyReason::Forbidden(STAFF_ONLY)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: [Resource; 3] = [Resource::Topic, Resource::Video, Resource::Task];
    const ALL_ACTIONS: [Action; 5] = [
        Action::List,
        Action::Read,
        Action::Create,
        Action::Update,
        Action::Delete,
    ];

    fn student(id: i64) -> Caller {
        Caller::Authenticated {
            user_id: id,
            is_staff: false,
            is_superuser: false,
        }
    }

    fn staff(id: i64) -> Caller {
        Caller::Authenticated {
            user_id: id,
            is_staff: true,
            is_superuser: false,
        }
    }

    fn superuser(id: i64) -> Caller {
        Caller::Authenticated {
            user_id: id,
            is_staff: true,
            is_superuser: true,
        }
    }

    fn owned_by(id: i64) -> Resource {
        Resource::Submission(Some(Ownership { owner_id: id }))
    }

    fn payload(grade: Option<Option<i32>>, forged_user: Option<i64>) -> SubmissionPayload {
        raw_payload(
            grade.map(|g| g.map(serde_json::Value::from)),
            forged_user.map(serde_json::Value::from),
        )
    }

    fn raw_payload(
        grade: Option<Option<serde_json::Value>>,
        forged_user: Option<serde_json::Value>,
    ) -> SubmissionPayload {
        SubmissionPayload {
            task_id: Some(42),
            file: Some("token".into()),
            grade,
            user_id: forged_user,
        }
    }

    #[test]
    fn test_catalog_reads_are_public() {
        for resource in CATALOG {
            for caller in [Caller::Anonymous, student(1), staff(2)] {
                assert_eq!(
                    AccessPolicy::authorize(&caller, &resource, Action::List),
                    Decision::Allow
                );
                assert_eq!(
                    AccessPolicy::authorize(&caller, &resource, Action::Read),
                    Decision::Allow
                );
            }
        }
    }

    #[test]
    fn test_catalog_writes_require_staff() {
        for resource in CATALOG {
            for action in [Action::Create, Action::Update, Action::Delete] {
                assert_eq!(
                    AccessPolicy::authorize(&Caller::Anonymous, &resource, action),
                    Decision::Deny(DenyReason::AuthenticationRequired)
                );
                assert!(matches!(
                    AccessPolicy::authorize(&student(1), &resource, action),
                    Decision::Deny(DenyReason::Forbidden(_))
                ));
                assert_eq!(
                    AccessPolicy::authorize(&staff(2), &resource, action),
                    Decision::Allow
                );
            }
        }
    }

    #[test]
    fn test_topic_contents_require_authentication() {
        assert_eq!(
            AccessPolicy::authorize(&Caller::Anonymous, &Resource::TopicContents, Action::Read),
            Decision::Deny(DenyReason::AuthenticationRequired)
        );
        assert_eq!(
            AccessPolicy::authorize(&student(1), &Resource::TopicContents, Action::Read),
            Decision::Allow
        );
    }

    #[test]
    fn test_anonymous_cannot_touch_submissions() {
        for action in ALL_ACTIONS {
            assert_eq!(
                AccessPolicy::authorize(&Caller::Anonymous, &owned_by(1), action),
                Decision::Deny(DenyReason::AuthenticationRequired)
            );
        }
        assert_eq!(
            AccessPolicy::submission_scope(&Caller::Anonymous),
            Err(DenyReason::AuthenticationRequired)
        );
    }

    #[test]
    fn test_submission_scope() {
        assert_eq!(
            AccessPolicy::submission_scope(&staff(9)),
            Ok(SubmissionScope::All)
        );
        assert_eq!(
            AccessPolicy::submission_scope(&student(3)),
            Ok(SubmissionScope::OwnedBy(3))
        );
        assert!(SubmissionScope::OwnedBy(3).includes(3));
        assert!(!SubmissionScope::OwnedBy(3).includes(4));
        assert!(SubmissionScope::All.includes(4));
    }

    #[test]
    fn test_foreign_submission_is_forbidden_for_non_staff() {
        let other = owned_by(2);
        for action in [Action::Read, Action::Update, Action::Delete] {
            assert!(matches!(
                AccessPolicy::authorize(&student(1), &other, action),
                Decision::Deny(DenyReason::Forbidden(_))
            ));
        }
    }

    #[test]
    fn test_owner_and_staff_access() {
        let own = owned_by(1);
        assert_eq!(
            AccessPolicy::authorize(&student(1), &own, Action::Read),
            Decision::Allow
        );
        assert_eq!(
            AccessPolicy::authorize(&student(1), &own, Action::Delete),
            Decision::Allow
        );
        assert_eq!(
            AccessPolicy::authorize(&student(1), &own, Action::Update),
            Decision::AllowWithFieldMask(FieldMask::OWNER_UPDATE)
        );
        assert_eq!(
            AccessPolicy::authorize(&staff(5), &own, Action::Update),
            Decision::AllowWithFieldMask(FieldMask::STAFF_UPDATE)
        );
        assert_eq!(
            AccessPolicy::authorize(&staff(5), &own, Action::Read),
            Decision::Allow
        );
    }

    #[test]
    fn test_instance_action_without_target_is_denied() {
        assert!(matches!(
            AccessPolicy::authorize(&staff(5), &Resource::Submission(None), Action::Read),
            Decision::Deny(DenyReason::Forbidden(_))
        ));
    }

    #[test]
    fn test_create_forces_owner_and_drops_grade() {
        let caller = student(7);
        let mask = AccessPolicy::authorize(&caller, &Resource::Submission(None), Action::Create)
            .field_mask()
            .expect("create is allowed with a mask");
        let write = AccessPolicy::narrow_submission_write(
            &caller,
            mask,
            Action::Create,
            payload(Some(Some(100)), Some(1)),
        )
        .expect("grade is well formed");
        assert_eq!(write.owner_id, Some(7));
        assert_eq!(write.grade, None);
        assert_eq!(write.task_id, Some(42));
    }

    #[test]
    fn test_staff_create_still_cannot_grade() {
        let caller = staff(3);
        let write = AccessPolicy::narrow_submission_write(
            &caller,
            FieldMask::CREATE,
            Action::Create,
            payload(Some(Some(80)), Some(99)),
        )
        .expect("grade is well formed");
        assert_eq!(write.owner_id, Some(3));
        assert_eq!(write.grade, None);
    }

    #[test]
    fn test_owner_update_silently_drops_grade() {
        let caller = student(7);
        let mask = AccessPolicy::authorize(&caller, &owned_by(7), Action::Update)
            .field_mask()
            .expect("owner may update");
        let write = AccessPolicy::narrow_submission_write(
            &caller,
            mask,
            Action::Update,
            payload(Some(Some(100)), Some(1)),
        )
        .expect("grade is well formed");
        assert_eq!(write.grade, None);
        assert_eq!(write.owner_id, None);
        assert_eq!(write.file.as_deref(), Some("token"));
    }

    #[test]
    fn test_masked_grade_is_never_parsed() {
        let caller = student(7);
        let mask = AccessPolicy::authorize(&caller, &owned_by(7), Action::Update)
            .field_mask()
            .expect("owner may update");
        for raw in [
            serde_json::Value::from("A+"),
            serde_json::Value::from(99_999_999_999_i64),
        ] {
            let write = AccessPolicy::narrow_submission_write(
                &caller,
                mask,
                Action::Update,
                raw_payload(Some(Some(raw)), Some(serde_json::Value::from("someone-else"))),
            )
            .expect("masked grade is dropped, not rejected");
            assert_eq!(write.grade, None);
        }
    }

    #[test]
    fn test_staff_malformed_grade_is_a_field_error() {
        let caller = staff(3);
        let mask = AccessPolicy::authorize(&caller, &owned_by(7), Action::Update)
            .field_mask()
            .expect("staff may update");
        let errors = AccessPolicy::narrow_submission_write(
            &caller,
            mask,
            Action::Update,
            raw_payload(Some(Some(serde_json::Value::from("A+"))), None),
        )
        .expect_err("staff grade must be an integer");
        assert!(errors.contains("grade"));
    }

    #[test]
    fn test_staff_update_keeps_grade() {
        let caller = staff(3);
        let mask = AccessPolicy::authorize(&caller, &owned_by(7), Action::Update)
            .field_mask()
            .expect("staff may update");
        let write = AccessPolicy::narrow_submission_write(
            &caller,
            mask,
            Action::Update,
            payload(Some(Some(90)), None),
        )
        .expect("grade is well formed");
        assert_eq!(write.grade, Some(Some(90)));

        let cleared = AccessPolicy::narrow_submission_write(
            &caller,
            mask,
            Action::Update,
            payload(Some(None), None),
        )
        .expect("grade is well formed");
        assert_eq!(cleared.grade, Some(None));
    }

    #[test]
    fn test_file_download_rules() {
        let private = Resource::File(Some(FileTarget {
            uploader_id: 1,
            attached_to_catalog: false,
        }));
        let public = Resource::File(Some(FileTarget {
            uploader_id: 1,
            attached_to_catalog: true,
        }));
        assert_eq!(
            AccessPolicy::authorize(&student(1), &private, Action::Read),
            Decision::Allow
        );
        assert!(!AccessPolicy::authorize(&student(2), &private, Action::Read).is_allowed());
        assert_eq!(
            AccessPolicy::authorize(&staff(3), &private, Action::Read),
            Decision::Allow
        );
        assert_eq!(
            AccessPolicy::authorize(&student(2), &public, Action::Read),
            Decision::Allow
        );
        assert_eq!(
            AccessPolicy::authorize(&Caller::Anonymous, &public, Action::Read),
            Decision::Deny(DenyReason::AuthenticationRequired)
        );
        assert_eq!(
            AccessPolicy::authorize(&student(2), &Resource::File(None), Action::Create),
            Decision::Allow
        );
    }

    #[test]
    fn test_user_account_rules() {
        assert!(
            !AccessPolicy::authorize(&student(1), &Resource::UserAccount(None), Action::List)
                .is_allowed()
        );
        assert!(
            AccessPolicy::authorize(&staff(2), &Resource::UserAccount(None), Action::List)
                .is_allowed()
        );
        assert!(
            AccessPolicy::authorize(&student(1), &Resource::UserAccount(Some(1)), Action::Read)
                .is_allowed()
        );
        assert!(
            !AccessPolicy::authorize(&student(1), &Resource::UserAccount(Some(2)), Action::Read)
                .is_allowed()
        );
        assert!(
            !AccessPolicy::authorize(&staff(2), &Resource::UserAccount(Some(1)), Action::Update)
                .is_allowed()
        );
        assert!(
            AccessPolicy::authorize(&superuser(4), &Resource::UserAccount(Some(1)), Action::Update)
                .is_allowed()
        );
        assert!(
            !AccessPolicy::authorize(&superuser(4), &Resource::UserAccount(Some(1)), Action::Delete)
                .is_allowed()
        );
    }

    #[test]
    fn test_api_schema_requires_authentication() {
        assert_eq!(
            AccessPolicy::authorize(&Caller::Anonymous, &Resource::ApiSchema, Action::Read),
            Decision::Deny(DenyReason::AuthenticationRequired)
        );
        assert_eq!(
            AccessPolicy::authorize(&student(1), &Resource::ApiSchema, Action::Read),
            Decision::Allow
        );
    }
}
