use serde::Serialize;
use ts_rs::TS;

use super::entities::StoredFile;

/// 上传结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "file.ts")]
pub struct FileUploadResponse {
    /// 下载 token
    pub download_token: String,
    /// 原始文件名
    pub file_name: String,
    /// 文件大小(字节)
    pub size: i64,
    /// 文件类型
    pub content_type: String,
    /// 上传时间
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<StoredFile> for FileUploadResponse {
    fn from(file: StoredFile) -> Self {
        Self {
            download_token: file.download_token,
            file_name: file.original_name,
            size: file.file_size,
            content_type: file.content_type,
            created_at: file.created_at,
        }
    }
}
