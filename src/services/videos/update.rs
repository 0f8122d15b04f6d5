use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{VideoService, check_references};
use crate::models::videos::requests::VideoPayload;
use crate::models::{ApiResponse, ErrorCode, WriteMode};
use crate::policy::{AccessPolicy, Action, Caller, Resource};
use crate::services::{deny_response, error_response, not_found_response, validation_response};

pub async fn update_video(
    service: &VideoService,
    request: &HttpRequest,
    id: i64,
    payload: VideoPayload,
    mode: WriteMode,
) -> ActixResult<HttpResponse> {
    let caller = Caller::from_request(request);
    if let Err(reason) =
        AccessPolicy::authorize(&caller, &Resource::Video, Action::Update).into_result()
    {
        return Ok(deny_response(reason));
    }

    let storage = service.get_storage(request);
    match storage.get_video_by_id(id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found_response(ErrorCode::VideoNotFound, "Video not found")),
        Err(e) => return Ok(error_response(e)),
    }

    if let Err(errors) = payload.validate(mode) {
        return Ok(validation_response(errors));
    }
    match check_references(storage.as_ref(), &caller, &payload).await {
        Ok(Some(errors)) => return Ok(validation_response(errors)),
        Ok(None) => {}
        Err(e) => return Ok(error_response(e)),
    }

    match storage.update_video(id, payload.into_changes()).await {
        Ok(Some(video)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            video,
            "Video updated successfully",
        ))),
        Ok(None) => Ok(not_found_response(ErrorCode::VideoNotFound, "Video not found")),
        Err(e) => Ok(error_response(e)),
    }
}
