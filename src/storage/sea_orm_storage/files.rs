use super::SeaOrmStorage;
use crate::entity::files::{ActiveModel, Column, Entity as Files};
use crate::entity::tasks::{Column as TaskColumn, Entity as Tasks};
use crate::entity::videos::{Column as VideoColumn, Entity as Videos};
use crate::errors::{CourseHubError, Result};
use crate::models::files::entities::{NewStoredFile, StoredFile};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 保存上传记录
    pub async fn create_file_impl(&self, file: NewStoredFile) -> Result<StoredFile> {
        let model = ActiveModel {
            download_token: Set(file.download_token),
            original_name: Set(file.original_name),
            stored_name: Set(file.stored_name),
            file_size: Set(file.file_size),
            content_type: Set(file.content_type),
            uploader_id: Set(file.uploader_id),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("保存文件记录失败: {e}")))?;

        Ok(result.into_file())
    }

    /// 通过下载 token 获取文件
    pub async fn get_file_by_token_impl(&self, token: &str) -> Result<Option<StoredFile>> {
        let result = Files::find()
            .filter(Column::DownloadToken.eq(token))
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询文件失败: {e}")))?;

        Ok(result.map(|m| m.into_file()))
    }

    /// 文件是否作为视频或任务附件公开
    pub async fn is_file_attached_to_catalog_impl(&self, token: &str) -> Result<bool> {
        let videos = Videos::find()
            .filter(VideoColumn::VideoFile.eq(token))
            .count(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询视频引用失败: {e}")))?;
        if videos > 0 {
            return Ok(true);
        }

        let tasks = Tasks::find()
            .filter(TaskColumn::Attachment.eq(token))
            .count(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询任务引用失败: {e}")))?;

        Ok(tasks > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support;
    use crate::models::files::entities::NewStoredFile;
    use crate::models::topics::requests::NewTopic;
    use crate::models::videos::requests::NewVideo;
    use crate::storage::Storage;

    #[tokio::test]
    async fn test_file_records_and_catalog_attachment() {
        let storage = test_support::storage().await;
        let staff = test_support::user(&storage, "staff", true).await;
        let file = storage
            .create_file(NewStoredFile {
                download_token: "tok-video".into(),
                original_name: "intro.mp4".into(),
                stored_name: "1-intro.bin".into(),
                file_size: 2048,
                content_type: "video/mp4".into(),
                uploader_id: staff.id,
            })
            .await
            .unwrap();
        assert_eq!(file.uploader_id, staff.id);
        assert_eq!(
            storage
                .get_file_by_token("tok-video")
                .await
                .unwrap()
                .map(|f| f.original_name),
            Some("intro.mp4".to_string())
        );
        assert!(storage.get_file_by_token("missing").await.unwrap().is_none());
        assert!(!storage.is_file_attached_to_catalog("tok-video").await.unwrap());

        let topic = storage
            .create_topic(NewTopic {
                title: "Intro".into(),
                description: String::new(),
            })
            .await
            .unwrap();
        storage
            .create_video(NewVideo {
                topic_id: topic.id,
                title: "Welcome".into(),
                video_file: "tok-video".into(),
            })
            .await
            .unwrap();
        assert!(storage.is_file_attached_to_catalog("tok-video").await.unwrap());
    }
}
