use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::VideoService;
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{AccessPolicy, Action, Caller, Resource};
use crate::services::{deny_response, error_response, not_found_response};

pub async fn delete_video(
    service: &VideoService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let caller = Caller::from_request(request);
    if let Err(reason) =
        AccessPolicy::authorize(&caller, &Resource::Video, Action::Delete).into_result()
    {
        return Ok(deny_response(reason));
    }

    let storage = service.get_storage(request);
    match storage.delete_video(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Video deleted successfully"))),
        Ok(false) => Ok(not_found_response(ErrorCode::VideoNotFound, "Video not found")),
        Err(e) => Ok(error_response(e)),
    }
}
