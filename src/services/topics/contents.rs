use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TopicService;
use crate::models::topics::responses::{TopicWithTasks, TopicWithVideos};
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{AccessPolicy, Action, Caller, Resource};
use crate::services::{deny_response, error_response, not_found_response};

pub async fn get_topic_videos(
    service: &TopicService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let caller = Caller::from_request(request);
    if let Err(reason) =
        AccessPolicy::authorize(&caller, &Resource::TopicContents, Action::Read).into_result()
    {
        return Ok(deny_response(reason));
    }

    let storage = service.get_storage(request);
    let topic = match storage.get_topic_by_id(id).await {
        Ok(Some(topic)) => topic,
        Ok(None) => return Ok(not_found_response(ErrorCode::TopicNotFound, "Topic not found")),
        Err(e) => return Ok(error_response(e)),
    };

    match storage.list_topic_videos(id).await {
        Ok(videos) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            TopicWithVideos { topic, videos },
            "Topic videos retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}

pub async fn get_topic_tasks(
    service: &TopicService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let caller = Caller::from_request(request);
    if let Err(reason) =
        AccessPolicy::authorize(&caller, &Resource::TopicContents, Action::Read).into_result()
    {
        return Ok(deny_response(reason));
    }

    let storage = service.get_storage(request);
    let topic = match storage.get_topic_by_id(id).await {
        Ok(Some(topic)) => topic,
        Ok(None) => return Ok(not_found_response(ErrorCode::TopicNotFound, "Topic not found")),
        Err(e) => return Ok(error_response(e)),
    };

    match storage.list_topic_tasks(id).await {
        Ok(tasks) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            TopicWithTasks { topic, tasks },
            "Topic tasks retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}
