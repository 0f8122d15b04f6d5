use super::SeaOrmStorage;
use crate::entity::videos::{ActiveModel, Column, Entity as Videos};
use crate::errors::{CourseHubError, Result};
use crate::models::{
    PaginationInfo,
    common::page_window,
    videos::{
        entities::{Video, VideoListResponse},
        requests::{NewVideo, VideoChanges, VideoListQuery},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_video_impl(&self, video: NewVideo) -> Result<Video> {
        let model = ActiveModel {
            topic_id: Set(video.topic_id),
            title: Set(video.title),
            video_file: Set(video.video_file),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("创建视频失败: {e}")))?;

        Ok(result.into_video())
    }

    pub async fn get_video_by_id_impl(&self, id: i64) -> Result<Option<Video>> {
        let result = Videos::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询视频失败: {e}")))?;

        Ok(result.map(|m| m.into_video()))
    }

    pub async fn list_videos_with_pagination_impl(
        &self,
        query: VideoListQuery,
    ) -> Result<VideoListResponse> {
        let (page, size) = page_window(query.page, query.size);

        let mut select = Videos::find();
        if let Some(topic_id) = query.topic_id {
            select = select.filter(Column::TopicId.eq(topic_id));
        }

        let paginator = select.order_by_asc(Column::Id).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询视频总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询视频页数失败: {e}")))?;
        let videos = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询视频列表失败: {e}")))?;

        Ok(VideoListResponse {
            items: videos.into_iter().map(|m| m.into_video()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_video_impl(&self, id: i64, changes: VideoChanges) -> Result<Option<Video>> {
        let Some(existing) = Videos::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询视频失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.clone().into();
        if let Some(topic_id) = changes.topic_id {
            model.topic_id = Set(topic_id);
        }
        if let Some(title) = changes.title {
            model.title = Set(title);
        }
        if let Some(video_file) = changes.video_file {
            model.video_file = Set(video_file);
        }

        if !model.is_changed() {
            return Ok(Some(existing.into_video()));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("更新视频失败: {e}")))?;

        Ok(Some(updated.into_video()))
    }

    pub async fn delete_video_impl(&self, id: i64) -> Result<bool> {
        let result = Videos::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("删除视频失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support;
    use crate::models::topics::requests::NewTopic;
    use crate::models::videos::requests::{NewVideo, VideoChanges, VideoListQuery};
    use crate::storage::Storage;

    #[tokio::test]
    async fn test_filter_by_topic_and_move() {
        let storage = test_support::storage().await;
        let a = storage
            .create_topic(NewTopic {
                title: "A".into(),
                description: String::new(),
            })
            .await
            .unwrap();
        let b = storage
            .create_topic(NewTopic {
                title: "B".into(),
                description: String::new(),
            })
            .await
            .unwrap();
        let video = storage
            .create_video(NewVideo {
                topic_id: a.id,
                title: "Clip".into(),
                video_file: "tok".into(),
            })
            .await
            .unwrap();

        let in_b = VideoListQuery {
            topic_id: Some(b.id),
            ..Default::default()
        };
        assert_eq!(
            storage
                .list_videos_with_pagination(in_b.clone())
                .await
                .unwrap()
                .pagination
                .total,
            0
        );

        let moved = storage
            .update_video(
                video.id,
                VideoChanges {
                    topic_id: Some(b.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .expect("video exists");
        assert_eq!(moved.topic_id, b.id);
        assert_eq!(moved.title, "Clip");
        assert_eq!(
            storage
                .list_videos_with_pagination(in_b)
                .await
                .unwrap()
                .items
                .len(),
            1
        );

        assert!(storage.delete_video(video.id).await.unwrap());
        assert!(!storage.delete_video(video.id).await.unwrap());
    }
}
