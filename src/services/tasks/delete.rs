use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TaskService;
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{AccessPolicy, Action, Caller, Resource};
use crate::services::{deny_response, error_response, not_found_response};

// 连同任务的提交一并删除
pub async fn delete_task(
    service: &TaskService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let caller = Caller::from_request(request);
    if let Err(reason) =
        AccessPolicy::authorize(&caller, &Resource::Task, Action::Delete).into_result()
    {
        return Ok(deny_response(reason));
    }

    let storage = service.get_storage(request);
    match storage.delete_task(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Task deleted successfully"))),
        Ok(false) => Ok(not_found_response(ErrorCode::TaskNotFound, "Task not found")),
        Err(e) => Ok(error_response(e)),
    }
}
