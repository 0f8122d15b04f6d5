use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程任务
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "task.ts")]
pub struct Task {
    pub id: i64,
    pub topic_id: i64,
    pub title: String,
    pub description: String,
    /// 附件下载 token
    pub attachment: Option<String>,
    /// 创建者（只读）
    pub creator_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "task.ts")]
pub struct TaskListResponse {
    pub items: Vec<Task>,
    pub pagination: crate::models::PaginationInfo,
}
