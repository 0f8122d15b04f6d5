use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::VideoService;
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{AccessPolicy, Action, Caller, Resource};
use crate::services::{deny_response, error_response, not_found_response};

pub async fn get_video(
    service: &VideoService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let caller = Caller::from_request(request);
    if let Err(reason) = AccessPolicy::authorize(&caller, &Resource::Video, Action::Read).into_result()
    {
        return Ok(deny_response(reason));
    }

    let storage = service.get_storage(request);
    match storage.get_video_by_id(id).await {
        Ok(Some(video)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            video,
            "Video retrieved successfully",
        ))),
        Ok(None) => Ok(not_found_response(ErrorCode::VideoNotFound, "Video not found")),
        Err(e) => Ok(error_response(e)),
    }
}
