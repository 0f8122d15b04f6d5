use std::sync::Arc;

use crate::models::{
    files::entities::{NewStoredFile, StoredFile},
    submissions::{
        entities::Submission,
        requests::{NewSubmission, SubmissionChanges, SubmissionListQuery},
        responses::SubmissionListResponse,
    },
    tasks::{
        entities::{Task, TaskListResponse},
        requests::{NewTask, TaskChanges, TaskListQuery},
    },
    topics::{
        entities::Topic,
        requests::{NewTopic, TopicChanges, TopicListQuery},
        responses::{TopicDetail, TopicListResponse},
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
    videos::{
        entities::{Video, VideoListResponse},
        requests::{NewVideo, VideoChanges, VideoListQuery},
    },
};
use crate::policy::SubmissionScope;

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 主题管理方法
    async fn create_topic(&self, topic: NewTopic) -> Result<Topic>;
    async fn get_topic_by_id(&self, id: i64) -> Result<Option<Topic>>;
    // 主题详情（嵌套视频与任务）
    async fn get_topic_detail(&self, id: i64) -> Result<Option<TopicDetail>>;
    async fn list_topics_with_pagination(&self, query: TopicListQuery)
    -> Result<TopicListResponse>;
    async fn update_topic(&self, id: i64, changes: TopicChanges) -> Result<Option<Topic>>;
    // 删除主题，连同其视频、任务及任务的提交
    async fn delete_topic(&self, id: i64) -> Result<bool>;
    async fn list_topic_videos(&self, topic_id: i64) -> Result<Vec<Video>>;
    async fn list_topic_tasks(&self, topic_id: i64) -> Result<Vec<Task>>;

    /// 视频管理方法
    async fn create_video(&self, video: NewVideo) -> Result<Video>;
    async fn get_video_by_id(&self, id: i64) -> Result<Option<Video>>;
    async fn list_videos_with_pagination(&self, query: VideoListQuery)
    -> Result<VideoListResponse>;
    async fn update_video(&self, id: i64, changes: VideoChanges) -> Result<Option<Video>>;
    async fn delete_video(&self, id: i64) -> Result<bool>;

    /// 任务管理方法
    async fn create_task(&self, task: NewTask) -> Result<Task>;
    async fn get_task_by_id(&self, id: i64) -> Result<Option<Task>>;
    async fn list_tasks_with_pagination(&self, query: TaskListQuery) -> Result<TaskListResponse>;
    async fn update_task(&self, id: i64, changes: TaskChanges) -> Result<Option<Task>>;
    // 删除任务，连同其提交
    async fn delete_task(&self, id: i64) -> Result<bool>;

    /// 提交管理方法（查询均受可见范围约束）
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission>;
    async fn get_submission_by_id(
        &self,
        id: i64,
        scope: SubmissionScope,
    ) -> Result<Option<Submission>>;
    async fn list_submissions_with_pagination(
        &self,
        scope: SubmissionScope,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse>;
    async fn update_submission(
        &self,
        id: i64,
        changes: SubmissionChanges,
    ) -> Result<Option<Submission>>;
    async fn delete_submission(&self, id: i64) -> Result<bool>;

    /// 文件管理方法
    async fn create_file(&self, file: NewStoredFile) -> Result<StoredFile>;
    // 通过唯一 token 获取文件信息
    async fn get_file_by_token(&self, token: &str) -> Result<Option<StoredFile>>;
    // 文件是否被视频或任务附件引用
    async fn is_file_attached_to_catalog(&self, token: &str) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
