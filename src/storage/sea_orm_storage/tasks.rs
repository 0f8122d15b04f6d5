use super::SeaOrmStorage;
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::entity::tasks::{ActiveModel, Column, Entity as Tasks};
use crate::errors::{CourseHubError, Result};
use crate::models::{
    PaginationInfo,
    common::page_window,
    tasks::{
        entities::{Task, TaskListResponse},
        requests::{NewTask, TaskChanges, TaskListQuery},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    pub async fn create_task_impl(&self, task: NewTask) -> Result<Task> {
        let model = ActiveModel {
            topic_id: Set(task.topic_id),
            title: Set(task.title),
            description: Set(task.description),
            attachment: Set(task.attachment),
            creator_id: Set(Some(task.creator_id)),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("创建任务失败: {e}")))?;

        Ok(result.into_task())
    }

    pub async fn get_task_by_id_impl(&self, id: i64) -> Result<Option<Task>> {
        let result = Tasks::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询任务失败: {e}")))?;

        Ok(result.map(|m| m.into_task()))
    }

    pub async fn list_tasks_with_pagination_impl(
        &self,
        query: TaskListQuery,
    ) -> Result<TaskListResponse> {
        let (page, size) = page_window(query.page, query.size);

        let mut select = Tasks::find();
        if let Some(topic_id) = query.topic_id {
            select = select.filter(Column::TopicId.eq(topic_id));
        }
        if let Some(creator_id) = query.creator_id {
            select = select.filter(Column::CreatorId.eq(creator_id));
        }

        let paginator = select.order_by_asc(Column::Id).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询任务总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询任务页数失败: {e}")))?;
        let tasks = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询任务列表失败: {e}")))?;

        Ok(TaskListResponse {
            items: tasks.into_iter().map(|m| m.into_task()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_task_impl(&self, id: i64, changes: TaskChanges) -> Result<Option<Task>> {
        let Some(existing) = Tasks::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询任务失败: {e}")))?
        else {
            return Ok(None);
        };

        // creator_id 只读
        let mut model: ActiveModel = existing.clone().into();
        if let Some(topic_id) = changes.topic_id {
            model.topic_id = Set(topic_id);
        }
        if let Some(title) = changes.title {
            model.title = Set(title);
        }
        if let Some(description) = changes.description {
            model.description = Set(description);
        }
        if let Some(attachment) = changes.attachment {
            model.attachment = Set(attachment);
        }

        if !model.is_changed() {
            return Ok(Some(existing.into_task()));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("更新任务失败: {e}")))?;

        Ok(Some(updated.into_task()))
    }

    /// 删除任务（事务内先删除其提交）
    pub async fn delete_task_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("开启事务失败: {e}")))?;

        Submissions::delete_many()
            .filter(SubmissionColumn::TaskId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("删除提交失败: {e}")))?;

        let result = Tasks::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("删除任务失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
