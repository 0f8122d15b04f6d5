pub mod api_docs;
pub mod auth;
pub mod files;
pub mod submissions;
pub mod tasks;
pub mod topics;
pub mod users;
pub mod videos;

pub use api_docs::ApiDocsService;
pub use auth::AuthService;
pub use files::FileService;
pub use submissions::SubmissionService;
pub use tasks::TaskService;
pub use topics::TopicService;
pub use users::UserService;
pub use videos::VideoService;

use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::errors::CourseHubError;
use crate::models::{ApiResponse, ErrorCode, FieldErrors};
use crate::policy::DenyReason;
use crate::storage::Storage;

pub(crate) fn storage_from_request(request: &HttpRequest) -> Arc<dyn Storage> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone()
}

pub(crate) fn cache_from_request(request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
}

/// 内部错误 → 统一响应
pub(crate) fn error_response(err: CourseHubError) -> HttpResponse {
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!("{}", err);
    }
    HttpResponse::build(status).json(ApiResponse::from_error(&err))
}

/// 策略拒绝 → 401 / 403
pub(crate) fn deny_response(reason: DenyReason) -> HttpResponse {
    error_response(reason.into())
}

/// 字段校验失败 → 400，data 为 `{field: [messages]}`
pub(crate) fn validation_response(errors: FieldErrors) -> HttpResponse {
    let message = errors.to_string();
    HttpResponse::BadRequest().json(ApiResponse::error(
        ErrorCode::ValidationFailed,
        errors,
        message,
    ))
}

pub(crate) fn not_found_response(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_deny_response_status() {
        assert_eq!(
            deny_response(DenyReason::AuthenticationRequired).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            deny_response(DenyReason::Forbidden("no")).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_validation_response_status() {
        let resp = validation_response(FieldErrors::invalid_pk("topic", 5));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
