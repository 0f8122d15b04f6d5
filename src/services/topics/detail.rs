use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TopicService;
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{AccessPolicy, Action, Caller, Resource};
use crate::services::{deny_response, error_response, not_found_response};

pub async fn get_topic(
    service: &TopicService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let caller = Caller::from_request(request);
    if let Err(reason) = AccessPolicy::authorize(&caller, &Resource::Topic, Action::Read).into_result()
    {
        return Ok(deny_response(reason));
    }

    let storage = service.get_storage(request);
    match storage.get_topic_detail(id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Topic retrieved successfully",
        ))),
        Ok(None) => Ok(not_found_response(ErrorCode::TopicNotFound, "Topic not found")),
        Err(e) => Ok(error_response(e)),
    }
}
