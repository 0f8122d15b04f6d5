use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{VideoService, check_references};
use crate::models::videos::requests::VideoPayload;
use crate::models::{ApiResponse, WriteMode};
use crate::policy::{AccessPolicy, Action, Caller, Resource};
use crate::services::{deny_response, error_response, validation_response};

pub async fn create_video(
    service: &VideoService,
    request: &HttpRequest,
    payload: VideoPayload,
) -> ActixResult<HttpResponse> {
    let caller = Caller::from_request(request);
    if let Err(reason) =
        AccessPolicy::authorize(&caller, &Resource::Video, Action::Create).into_result()
    {
        return Ok(deny_response(reason));
    }

    if let Err(errors) = payload.validate(WriteMode::Create) {
        return Ok(validation_response(errors));
    }

    let storage = service.get_storage(request);
    match check_references(storage.as_ref(), &caller, &payload).await {
        Ok(Some(errors)) => return Ok(validation_response(errors)),
        Ok(None) => {}
        Err(e) => return Ok(error_response(e)),
    }

    match storage.create_video(payload.into_new()).await {
        Ok(video) => Ok(HttpResponse::Created().json(ApiResponse::success(
            video,
            "Video created successfully",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}
