use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "file.ts")]
pub struct StoredFile {
    pub id: i64,
    // 下载 token，作为视频、附件与提交文件的引用
    pub download_token: String,
    // 原始文件名
    pub original_name: String,
    // 磁盘上的文件名
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub stored_name: String,
    // 文件大小（字节）
    pub file_size: i64,
    // 文件类型
    pub content_type: String,
    // 上传者
    pub uploader_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 新文件记录（存储层使用）
#[derive(Debug, Clone)]
pub struct NewStoredFile {
    pub download_token: String,
    pub original_name: String,
    pub stored_name: String,
    pub file_size: i64,
    pub content_type: String,
    pub uploader_id: i64,
}
