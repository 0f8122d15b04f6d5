//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod files;
mod submissions;
mod tasks;
mod topics;
mod users;
mod videos;

use crate::config::AppConfig;
use crate::errors::{CourseHubError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(url: &str, pool_size: u32, timeout: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 内存 SQLite（单连接），用于测试
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:", 1, 30).await
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| CourseHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .pragma("temp_store", "memory");
        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .pragma("cache_size", "-64000")
                .pragma("wal_autocheckpoint", "1000");
        }

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(pool_size.max(1))
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout));
        // 内存库随连接关闭而消失，连接不能回收
        pool_options = if in_memory {
            pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.idle_timeout(Duration::from_secs(300))
        };

        let pool = pool_options
            .connect_with(opt)
            .await
            .map_err(|e| CourseHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(pool_size.min(5))
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| CourseHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url.ends_with(".sqlite3") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(CourseHubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 主题模块
    async fn create_topic(&self, topic: NewTopic) -> Result<Topic> {
        self.create_topic_impl(topic).await
    }

    async fn get_topic_by_id(&self, id: i64) -> Result<Option<Topic>> {
        self.get_topic_by_id_impl(id).await
    }

    async fn get_topic_detail(&self, id: i64) -> Result<Option<TopicDetail>> {
        self.get_topic_detail_impl(id).await
    }

    async fn list_topics_with_pagination(
        &self,
        query: TopicListQuery,
    ) -> Result<TopicListResponse> {
        self.list_topics_with_pagination_impl(query).await
    }

    async fn update_topic(&self, id: i64, changes: TopicChanges) -> Result<Option<Topic>> {
        self.update_topic_impl(id, changes).await
    }

    async fn delete_topic(&self, id: i64) -> Result<bool> {
        self.delete_topic_impl(id).await
    }

    async fn list_topic_videos(&self, topic_id: i64) -> Result<Vec<Video>> {
        self.list_topic_videos_impl(topic_id).await
    }

    async fn list_topic_tasks(&self, topic_id: i64) -> Result<Vec<Task>> {
        self.list_topic_tasks_impl(topic_id).await
    }

    // 视频模块
    async fn create_video(&self, video: NewVideo) -> Result<Video> {
        self.create_video_impl(video).await
    }

    async fn get_video_by_id(&self, id: i64) -> Result<Option<Video>> {
        self.get_video_by_id_impl(id).await
    }

    async fn list_videos_with_pagination(
        &self,
        query: VideoListQuery,
    ) -> Result<VideoListResponse> {
        self.list_videos_with_pagination_impl(query).await
    }

    async fn update_video(&self, id: i64, changes: VideoChanges) -> Result<Option<Video>> {
        self.update_video_impl(id, changes).await
    }

    async fn delete_video(&self, id: i64) -> Result<bool> {
        self.delete_video_impl(id).await
    }

    // 任务模块
    async fn create_task(&self, task: NewTask) -> Result<Task> {
        self.create_task_impl(task).await
    }

    async fn get_task_by_id(&self, id: i64) -> Result<Option<Task>> {
        self.get_task_by_id_impl(id).await
    }

    async fn list_tasks_with_pagination(&self, query: TaskListQuery) -> Result<TaskListResponse> {
        self.list_tasks_with_pagination_impl(query).await
    }

    async fn update_task(&self, id: i64, changes: TaskChanges) -> Result<Option<Task>> {
        self.update_task_impl(id, changes).await
    }

    async fn delete_task(&self, id: i64) -> Result<bool> {
        self.delete_task_impl(id).await
    }

    // 提交模块
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission> {
        self.create_submission_impl(submission).await
    }

    async fn get_submission_by_id(
        &self,
        id: i64,
        scope: SubmissionScope,
    ) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id, scope).await
    }

    async fn list_submissions_with_pagination(
        &self,
        scope: SubmissionScope,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse> {
        self.list_submissions_with_pagination_impl(scope, query)
            .await
    }

    async fn update_submission(
        &self,
        id: i64,
        changes: SubmissionChanges,
    ) -> Result<Option<Submission>> {
        self.update_submission_impl(id, changes).await
    }

    async fn delete_submission(&self, id: i64) -> Result<bool> {
        self.delete_submission_impl(id).await
    }

    // 文件模块
    async fn create_file(&self, file: NewStoredFile) -> Result<StoredFile> {
        self.create_file_impl(file).await
    }

    async fn get_file_by_token(&self, token: &str) -> Result<Option<StoredFile>> {
        self.get_file_by_token_impl(token).await
    }

    async fn is_file_attached_to_catalog(&self, token: &str) -> Result<bool> {
        self.is_file_attached_to_catalog_impl(token).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SeaOrmStorage;
    use crate::models::users::requests::CreateUserRequest;
    use crate::models::users::entities::User;
    use crate::storage::Storage;

    pub async fn storage() -> SeaOrmStorage {
        SeaOrmStorage::in_memory()
            .await
            .expect("in-memory storage should start")
    }

    pub async fn user(storage: &SeaOrmStorage, name: &str, is_staff: bool) -> User {
        storage
            .create_user(CreateUserRequest {
                email: format!("{name}@example.com"),
                username: name.to_string(),
                password_hash: "hash".to_string(),
                is_staff,
                is_superuser: false,
            })
            .await
            .expect("create user")
    }
}
