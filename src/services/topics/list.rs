use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TopicService;
use crate::models::ApiResponse;
use crate::models::topics::requests::TopicListQuery;
use crate::policy::{AccessPolicy, Action, Caller, Resource};
use crate::services::{deny_response, error_response};

pub async fn list_topics(
    service: &TopicService,
    request: &HttpRequest,
    query: TopicListQuery,
) -> ActixResult<HttpResponse> {
    let caller = Caller::from_request(request);
    if let Err(reason) = AccessPolicy::authorize(&caller, &Resource::Topic, Action::List).into_result()
    {
        return Ok(deny_response(reason));
    }

    let storage = service.get_storage(request);
    match storage.list_topics_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Topics retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}
