use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::entity::tasks::{Column as TaskColumn, Entity as Tasks};
use crate::entity::topics::{ActiveModel, Column, Entity as Topics};
use crate::entity::videos::{Column as VideoColumn, Entity as Videos};
use crate::errors::{CourseHubError, Result};
use crate::models::{
    PaginationInfo,
    common::page_window,
    tasks::entities::Task,
    topics::{
        entities::Topic,
        requests::{NewTopic, TopicChanges, TopicListQuery},
        responses::{TopicDetail, TopicListResponse},
    },
    videos::entities::Video,
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建主题
    pub async fn create_topic_impl(&self, topic: NewTopic) -> Result<Topic> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            title: Set(topic.title),
            description: Set(topic.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("创建主题失败: {e}")))?;

        Ok(result.into_topic())
    }

    /// 通过 ID 获取主题
    pub async fn get_topic_by_id_impl(&self, id: i64) -> Result<Option<Topic>> {
        let result = Topics::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询主题失败: {e}")))?;

        Ok(result.map(|m| m.into_topic()))
    }

    /// 主题详情，嵌套视频与任务
    pub async fn get_topic_detail_impl(&self, id: i64) -> Result<Option<TopicDetail>> {
        let Some(topic) = self.get_topic_by_id_impl(id).await? else {
            return Ok(None);
        };
        let videos = self.list_topic_videos_impl(id).await?;
        let tasks = self.list_topic_tasks_impl(id).await?;

        Ok(Some(TopicDetail {
            topic,
            videos,
            tasks,
        }))
    }

    /// 分页列出主题
    pub async fn list_topics_with_pagination_impl(
        &self,
        query: TopicListQuery,
    ) -> Result<TopicListResponse> {
        let (page, size) = page_window(query.page, query.size);

        let mut select = Topics::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::Title.contains(&escaped));
        }

        let paginator = select.order_by_asc(Column::Id).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询主题总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询主题页数失败: {e}")))?;
        let topics = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询主题列表失败: {e}")))?;

        // 一次性取出本页主题的视频与任务
        let ids: Vec<i64> = topics.iter().map(|t| t.id).collect();
        let mut videos: HashMap<i64, Vec<Video>> = HashMap::new();
        let mut tasks: HashMap<i64, Vec<Task>> = HashMap::new();
        if !ids.is_empty() {
            let video_models = Videos::find()
                .filter(VideoColumn::TopicId.is_in(ids.clone()))
                .order_by_asc(VideoColumn::Id)
                .all(&self.db)
                .await
                .map_err(|e| CourseHubError::database_operation(format!("查询视频失败: {e}")))?;
            for video in video_models {
                videos
                    .entry(video.topic_id)
                    .or_default()
                    .push(video.into_video());
            }

            let task_models = Tasks::find()
                .filter(TaskColumn::TopicId.is_in(ids))
                .order_by_asc(TaskColumn::Id)
                .all(&self.db)
                .await
                .map_err(|e| CourseHubError::database_operation(format!("查询任务失败: {e}")))?;
            for task in task_models {
                tasks.entry(task.topic_id).or_default().push(task.into_task());
            }
        }

        let items = topics
            .into_iter()
            .map(|model| {
                let id = model.id;
                TopicDetail {
                    topic: model.into_topic(),
                    videos: videos.remove(&id).unwrap_or_default(),
                    tasks: tasks.remove(&id).unwrap_or_default(),
                }
            })
            .collect();

        Ok(TopicListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新主题
    pub async fn update_topic_impl(&self, id: i64, changes: TopicChanges) -> Result<Option<Topic>> {
        if self.get_topic_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(title) = changes.title {
            model.title = Set(title);
        }
        if let Some(description) = changes.description {
            model.description = Set(description);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("更新主题失败: {e}")))?;

        Ok(Some(updated.into_topic()))
    }

    /// 删除主题（事务内级联删除提交、任务、视频）
    pub async fn delete_topic_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("开启事务失败: {e}")))?;

        let task_ids: Vec<i64> = Tasks::find()
            .select_only()
            .column(TaskColumn::Id)
            .filter(TaskColumn::TopicId.eq(id))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询任务失败: {e}")))?;

        if !task_ids.is_empty() {
            Submissions::delete_many()
                .filter(SubmissionColumn::TaskId.is_in(task_ids))
                .exec(&txn)
                .await
                .map_err(|e| CourseHubError::database_operation(format!("删除提交失败: {e}")))?;
        }

        Tasks::delete_many()
            .filter(TaskColumn::TopicId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("删除任务失败: {e}")))?;

        Videos::delete_many()
            .filter(VideoColumn::TopicId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("删除视频失败: {e}")))?;

        let result = Topics::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("删除主题失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 主题下的视频
    pub async fn list_topic_videos_impl(&self, topic_id: i64) -> Result<Vec<Video>> {
        let videos = Videos::find()
            .filter(VideoColumn::TopicId.eq(topic_id))
            .order_by_asc(VideoColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询视频失败: {e}")))?;

        Ok(videos.into_iter().map(|m| m.into_video()).collect())
    }

    /// 主题下的任务
    pub async fn list_topic_tasks_impl(&self, topic_id: i64) -> Result<Vec<Task>> {
        let tasks = Tasks::find()
            .filter(TaskColumn::TopicId.eq(topic_id))
            .order_by_asc(TaskColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询任务失败: {e}")))?;

        Ok(tasks.into_iter().map(|m| m.into_task()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support;
    use crate::models::submissions::requests::NewSubmission;
    use crate::models::tasks::requests::NewTask;
    use crate::models::topics::requests::{NewTopic, TopicChanges, TopicListQuery};
    use crate::models::videos::requests::NewVideo;
    use crate::policy::SubmissionScope;
    use crate::storage::Storage;

    fn new_topic(title: &str) -> NewTopic {
        NewTopic {
            title: title.to_string(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn test_list_nests_contents() {
        let storage = test_support::storage().await;
        let staff = test_support::user(&storage, "staff", true).await;
        let first = storage.create_topic(new_topic("Ownership")).await.unwrap();
        let second = storage.create_topic(new_topic("Lifetimes")).await.unwrap();
        storage
            .create_video(NewVideo {
                topic_id: first.id,
                title: "Intro".into(),
                video_file: "tok-1".into(),
            })
            .await
            .unwrap();
        storage
            .create_task(NewTask {
                topic_id: second.id,
                title: "Lab".into(),
                description: String::new(),
                attachment: None,
                creator_id: staff.id,
            })
            .await
            .unwrap();

        let page = storage
            .list_topics_with_pagination(TopicListQuery::default())
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.items[0].topic.id, first.id);
        assert_eq!(page.items[0].videos.len(), 1);
        assert!(page.items[0].tasks.is_empty());
        assert_eq!(page.items[1].tasks.len(), 1);

        let search = storage
            .list_topics_with_pagination(TopicListQuery {
                search: Some("Life".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(search.items.len(), 1);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let storage = test_support::storage().await;
        let topic = storage
            .create_topic(NewTopic {
                title: "Traits".into(),
                description: "Shared behaviour".into(),
            })
            .await
            .unwrap();
        let updated = storage
            .update_topic(
                topic.id,
                TopicChanges {
                    title: Some("Traits and generics".into()),
                    description: None,
                },
            )
            .await
            .unwrap()
            .expect("topic exists");
        assert_eq!(updated.title, "Traits and generics");
        assert_eq!(updated.description, "Shared behaviour");
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let storage = test_support::storage().await;
        let staff = test_support::user(&storage, "staff", true).await;
        let student = test_support::user(&storage, "student", false).await;
        let topic = storage.create_topic(new_topic("Async")).await.unwrap();
        let video = storage
            .create_video(NewVideo {
                topic_id: topic.id,
                title: "Futures".into(),
                video_file: "tok-v".into(),
            })
            .await
            .unwrap();
        let task = storage
            .create_task(NewTask {
                topic_id: topic.id,
                title: "Executor".into(),
                description: String::new(),
                attachment: None,
                creator_id: staff.id,
            })
            .await
            .unwrap();
        let submission = storage
            .create_submission(NewSubmission {
                task_id: task.id,
                user_id: student.id,
                file: "tok-s".into(),
            })
            .await
            .unwrap();

        assert!(storage.delete_topic(topic.id).await.unwrap());
        assert!(storage.get_video_by_id(video.id).await.unwrap().is_none());
        assert!(storage.get_task_by_id(task.id).await.unwrap().is_none());
        assert!(
            storage
                .get_submission_by_id(submission.id, SubmissionScope::All)
                .await
                .unwrap()
                .is_none()
        );
        assert!(!storage.delete_topic(topic.id).await.unwrap());
    }
}
