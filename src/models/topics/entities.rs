use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程主题
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "topic.ts")]
pub struct Topic {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
