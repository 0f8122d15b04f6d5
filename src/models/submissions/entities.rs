use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学员提交
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct Submission {
    pub id: i64,
    pub task_id: i64,
    /// 提交者，创建时绑定为当前用户，之后不可修改
    pub user_id: i64,
    /// 文件下载 token
    pub file: String,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub grade: Option<i32>,
}
