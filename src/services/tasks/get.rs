use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TaskService;
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{AccessPolicy, Action, Caller, Resource};
use crate::services::{deny_response, error_response, not_found_response};

pub async fn get_task(
    service: &TaskService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let caller = Caller::from_request(request);
    if let Err(reason) = AccessPolicy::authorize(&caller, &Resource::Task, Action::Read).into_result()
    {
        return Ok(deny_response(reason));
    }

    let storage = service.get_storage(request);
    match storage.get_task_by_id(id).await {
        Ok(Some(task)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            task,
            "Task retrieved successfully",
        ))),
        Ok(None) => Ok(not_found_response(ErrorCode::TaskNotFound, "Task not found")),
        Err(e) => Ok(error_response(e)),
    }
}
