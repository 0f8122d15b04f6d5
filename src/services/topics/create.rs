use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TopicService;
use crate::models::topics::requests::TopicPayload;
use crate::models::{ApiResponse, WriteMode};
use crate::policy::{AccessPolicy, Action, Caller, Resource};
use crate::services::{deny_response, error_response, validation_response};

pub async fn create_topic(
    service: &TopicService,
    request: &HttpRequest,
    payload: TopicPayload,
) -> ActixResult<HttpResponse> {
    let caller = Caller::from_request(request);
    if let Err(reason) =
        AccessPolicy::authorize(&caller, &Resource::Topic, Action::Create).into_result()
    {
        return Ok(deny_response(reason));
    }

    if let Err(errors) = payload.validate(WriteMode::Create) {
        return Ok(validation_response(errors));
    }

    let storage = service.get_storage(request);
    match storage.create_topic(payload.into_new()).await {
        Ok(topic) => {
            tracing::info!("Topic {} created by user {:?}", topic.id, caller.user_id());
            Ok(HttpResponse::Created().json(ApiResponse::success(
                topic,
                "Topic created successfully",
            )))
        }
        Err(e) => Ok(error_response(e)),
    }
}
