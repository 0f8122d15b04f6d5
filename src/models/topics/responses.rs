use serde::Serialize;
use ts_rs::TS;

use super::entities::Topic;
use crate::models::PaginationInfo;
use crate::models::tasks::entities::Task;
use crate::models::videos::entities::Video;

// 主题详情（嵌套视频与任务）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "topic.ts")]
pub struct TopicDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub topic: Topic,
    pub videos: Vec<Video>,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "topic.ts")]
pub struct TopicWithVideos {
    #[serde(flatten)]
    #[ts(flatten)]
    pub topic: Topic,
    pub videos: Vec<Video>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "topic.ts")]
pub struct TopicWithTasks {
    #[serde(flatten)]
    #[ts(flatten)]
    pub topic: Topic,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "topic.ts")]
pub struct TopicListResponse {
    pub items: Vec<TopicDetail>,
    pub pagination: PaginationInfo,
}
