use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TopicService;
use crate::models::topics::requests::TopicPayload;
use crate::models::{ApiResponse, ErrorCode, WriteMode};
use crate::policy::{AccessPolicy, Action, Caller, Resource};
use crate::services::{deny_response, error_response, not_found_response, validation_response};

pub async fn update_topic(
    service: &TopicService,
    request: &HttpRequest,
    id: i64,
    payload: TopicPayload,
    mode: WriteMode,
) -> ActixResult<HttpResponse> {
    let caller = Caller::from_request(request);
    if let Err(reason) =
        AccessPolicy::authorize(&caller, &Resource::Topic, Action::Update).into_result()
    {
        return Ok(deny_response(reason));
    }

    if let Err(errors) = payload.validate(mode) {
        return Ok(validation_response(errors));
    }

    let storage = service.get_storage(request);
    match storage.update_topic(id, payload.into_changes()).await {
        Ok(Some(topic)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            topic,
            "Topic updated successfully",
        ))),
        Ok(None) => Ok(not_found_response(ErrorCode::TopicNotFound, "Topic not found")),
        Err(e) => Ok(error_response(e)),
    }
}
