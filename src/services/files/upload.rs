use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

use super::FileService;
use crate::config::AppConfig;
use crate::errors::CourseHubError;
use crate::models::files::entities::NewStoredFile;
use crate::models::{ApiResponse, ErrorCode, files::responses::FileUploadResponse};
use crate::policy::{AccessPolicy, Action, Caller, DenyReason, Resource};
use crate::services::{deny_response, error_response};
use crate::utils::{content_type_for, validate_magic_bytes};

fn upload_error(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

fn discard(path: &str) {
    if let Err(e) = fs::remove_file(path) {
        tracing::warn!("Failed to remove partial upload {}: {}", path, e);
    }
}

/// 提取小写扩展名（含点号）
fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

pub async fn handle_upload(
    service: &FileService,
    req: &HttpRequest,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let caller = Caller::from_request(req);
    if let Err(reason) =
        AccessPolicy::authorize(&caller, &Resource::File(None), Action::Create).into_result()
    {
        return Ok(deny_response(reason));
    }
    let Some(uploader_id) = caller.user_id() else {
        return Ok(deny_response(DenyReason::AuthenticationRequired));
    };

    let config = AppConfig::get();
    let upload_dir = &config.upload.dir;
    let max_size = config.upload.max_size;
    let allowed = &config.upload.allowed_extensions;

    // 确保上传目录存在
    if !Path::new(upload_dir).exists()
        && let Err(e) = fs::create_dir_all(upload_dir)
    {
        tracing::error!("{}", CourseHubError::file_operation(format!("{e}")));
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::FileUploadFailed,
                "Failed to create upload directory",
            )),
        );
    }

    let mut uploaded: Option<(String, String, String, i64)> = None;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();
        if name != "file" {
            continue;
        }
        if uploaded.is_some() {
            return Ok(upload_error(
                ErrorCode::MultifileUploadNotAllowed,
                "Only one file can be uploaded at a time",
            ));
        }

        let original_name = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let extension = extension_of(&original_name);
        if extension.is_empty() || !allowed.iter().any(|t| t.eq_ignore_ascii_case(&extension)) {
            return Ok(upload_error(
                ErrorCode::FileTypeNotAllowed,
                "File type not allowed",
            ));
        }

        let stored_name = format!("{}-{}.bin", chrono::Utc::now().timestamp(), Uuid::new_v4());
        let file_path = format!("{upload_dir}/{stored_name}");
        let mut f = match File::create(&file_path) {
            Ok(file) => file,
            Err(e) => {
                tracing::error!("{}", CourseHubError::file_operation(format!("{e}")));
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::FileUploadFailed,
                        "Failed to create file",
                    )),
                );
            }
        };

        let mut total_size: usize = 0;
        let mut first_chunk = true;
        while let Some(chunk) = field.next().await {
            let data = match chunk {
                Ok(data) => data,
                Err(e) => {
                    discard(&file_path);
                    return Err(e.into());
                }
            };

            // 第一个 chunk 校验魔术字节
            if first_chunk {
                first_chunk = false;
                if !validate_magic_bytes(&data, &extension) {
                    discard(&file_path);
                    return Ok(upload_error(
                        ErrorCode::FileTypeNotAllowed,
                        "File content does not match its extension",
                    ));
                }
            }

            total_size += data.len();
            if total_size > max_size {
                discard(&file_path);
                return Ok(upload_error(
                    ErrorCode::FileSizeExceeded,
                    "File size exceeds the limit",
                ));
            }
            if let Err(e) = f.write_all(&data) {
                discard(&file_path);
                return Ok(error_response(e.into()));
            }
        }

        if first_chunk {
            discard(&file_path);
            return Ok(upload_error(ErrorCode::FileUploadFailed, "Empty file"));
        }

        let content_type = content_type_for(&extension).to_string();
        uploaded = Some((original_name, stored_name, content_type, total_size as i64));
    }

    let Some((original_name, stored_name, content_type, file_size)) = uploaded else {
        return Ok(upload_error(
            ErrorCode::FileNotFound,
            "No file found in upload payload",
        ));
    };

    let storage = service.get_storage(req);
    let record = NewStoredFile {
        download_token: Uuid::new_v4().simple().to_string(),
        original_name,
        stored_name: stored_name.clone(),
        file_size,
        content_type,
        uploader_id,
    };

    match storage.create_file(record).await {
        Ok(file) => {
            tracing::info!(
                "User {} uploaded {} ({} bytes)",
                uploader_id,
                file.original_name,
                file.file_size
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                FileUploadResponse::from(file),
                "File uploaded successfully",
            )))
        }
        Err(e) => {
            discard(&format!("{upload_dir}/{stored_name}"));
            Ok(error_response(e))
        }
    }
}
