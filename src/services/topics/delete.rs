use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TopicService;
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{AccessPolicy, Action, Caller, Resource};
use crate::services::{deny_response, error_response, not_found_response};

// 连同视频、任务及其提交一并删除
pub async fn delete_topic(
    service: &TopicService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let caller = Caller::from_request(request);
    if let Err(reason) =
        AccessPolicy::authorize(&caller, &Resource::Topic, Action::Delete).into_result()
    {
        return Ok(deny_response(reason));
    }

    let storage = service.get_storage(request);
    match storage.delete_topic(id).await {
        Ok(true) => {
            tracing::info!("Topic {} deleted by user {:?}", id, caller.user_id());
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Topic deleted successfully")))
        }
        Ok(false) => Ok(not_found_response(ErrorCode::TopicNotFound, "Topic not found")),
        Err(e) => Ok(error_response(e)),
    }
}
