use super::SeaOrmStorage;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{CourseHubError, Result};
use crate::models::{
    PaginationInfo,
    common::page_window,
    submissions::{
        entities::Submission,
        requests::{NewSubmission, SubmissionChanges, SubmissionListQuery},
        responses::SubmissionListResponse,
    },
};
use crate::policy::SubmissionScope;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Select,
    Set,
};

/// 将可见范围转为查询条件
fn scoped(select: Select<Submissions>, scope: SubmissionScope) -> Select<Submissions> {
    match scope {
        SubmissionScope::All => select,
        SubmissionScope::OwnedBy(user_id) => select.filter(Column::UserId.eq(user_id)),
    }
}

impl SeaOrmStorage {
    pub async fn create_submission_impl(&self, submission: NewSubmission) -> Result<Submission> {
        // 成绩在创建时始终为空
        let model = ActiveModel {
            task_id: Set(submission.task_id),
            user_id: Set(submission.user_id),
            file: Set(submission.file),
            submitted_at: Set(chrono::Utc::now().timestamp()),
            grade: Set(None),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("创建提交失败: {e}")))?;

        Ok(result.into_submission())
    }

    pub async fn get_submission_by_id_impl(
        &self,
        id: i64,
        scope: SubmissionScope,
    ) -> Result<Option<Submission>> {
        let result = scoped(Submissions::find(), scope)
            .filter(Column::Id.eq(id))
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn list_submissions_with_pagination_impl(
        &self,
        scope: SubmissionScope,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse> {
        let (page, size) = page_window(query.page, query.size);

        let mut select = scoped(Submissions::find(), scope);
        if let Some(task_id) = query.task_id {
            select = select.filter(Column::TaskId.eq(task_id));
        }

        let paginator = select.order_by_asc(Column::Id).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询提交总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询提交页数失败: {e}")))?;
        let submissions = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(SubmissionListResponse {
            items: submissions
                .into_iter()
                .map(|m| m.into_submission())
                .collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新提交；user_id 与 submitted_at 不可变
    pub async fn update_submission_impl(
        &self,
        id: i64,
        changes: SubmissionChanges,
    ) -> Result<Option<Submission>> {
        let Some(existing) = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询提交失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.clone().into();
        if let Some(task_id) = changes.task_id {
            model.task_id = Set(task_id);
        }
        if let Some(file) = changes.file {
            model.file = Set(file);
        }
        if let Some(grade) = changes.grade {
            model.grade = Set(grade);
        }

        if !model.is_changed() {
            return Ok(Some(existing.into_submission()));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("更新提交失败: {e}")))?;

        Ok(Some(updated.into_submission()))
    }

    pub async fn delete_submission_impl(&self, id: i64) -> Result<bool> {
        let result = Submissions::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("删除提交失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
