use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FileService;
use crate::config::AppConfig;
use crate::errors::CourseHubError;
use crate::models::ErrorCode;
use crate::policy::{AccessPolicy, Action, Caller, DenyReason, FileTarget, Resource};
use crate::services::{deny_response, error_response, not_found_response};

pub async fn handle_download(
    service: &FileService,
    request: &HttpRequest,
    file_token: String,
) -> ActixResult<HttpResponse> {
    let caller = Caller::from_request(request);
    // 未认证时不泄露文件是否存在
    if !caller.is_authenticated() {
        return Ok(deny_response(DenyReason::AuthenticationRequired));
    }

    let storage = service.get_storage(request);

    let db_file = match storage.get_file_by_token(&file_token).await {
        Ok(Some(f)) => f,
        Ok(None) => return Ok(not_found_response(ErrorCode::FileNotFound, "File not found")),
        Err(e) => return Ok(error_response(e)),
    };

    let attached_to_catalog = match storage.is_file_attached_to_catalog(&file_token).await {
        Ok(attached) => attached,
        Err(e) => return Ok(error_response(e)),
    };

    let target = FileTarget {
        uploader_id: db_file.uploader_id,
        attached_to_catalog,
    };
    if let Err(reason) =
        AccessPolicy::authorize(&caller, &Resource::File(Some(target)), Action::Read).into_result()
    {
        return Ok(deny_response(reason));
    }

    let file_path = format!("{}/{}", AppConfig::get().upload.dir, db_file.stored_name);
    let bytes = match tokio::fs::read(&file_path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("File record {} has no data on disk", db_file.download_token);
            return Ok(not_found_response(ErrorCode::FileNotFound, "File not found"));
        }
        Err(e) => {
            return Ok(error_response(CourseHubError::file_operation(format!(
                "File read failed: {e}"
            ))));
        }
    };

    // 使用数据库中的原始文件名
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, db_file.content_type))
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(db_file.original_name)],
        })
        .body(bytes))
}
