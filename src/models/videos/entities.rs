use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程视频
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "video.ts")]
pub struct Video {
    pub id: i64,
    pub topic_id: i64,
    pub title: String,
    /// 文件下载 token
    pub video_file: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "video.ts")]
pub struct VideoListResponse {
    pub items: Vec<Video>,
    pub pagination: crate::models::PaginationInfo,
}
