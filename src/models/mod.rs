pub mod api;
pub mod auth;
pub mod common;
pub mod files;
pub mod submissions;
pub mod tasks;
pub mod topics;
pub mod users;
pub mod videos;

pub use common::{
    ApiResponse, FieldErrors, PaginationInfo, WriteMode,
};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 响应业务码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1005,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 账户
    AuthFailed = 2000,
    UserNameAlreadyExists = 2005,
    UserEmailAlreadyExists = 2006,
    UserNotFound = 2007,
    UserUpdateFailed = 2008,
    PasswordResetFailed = 2009,

    // 课程资源
    TopicNotFound = 3000,
    VideoNotFound = 3001,
    TaskNotFound = 3002,
    SubmissionNotFound = 3003,

    // 文件
    FileNotFound = 4000,
    FileUploadFailed = 4001,
    FileTypeNotAllowed = 4002,
    FileSizeExceeded = 4003,
    MultifileUploadNotAllowed = 4004,
    FileOperationFailed = 4005,
}
