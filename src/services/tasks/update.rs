use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TaskService, check_references};
use crate::models::tasks::requests::TaskPayload;
use crate::models::{ApiResponse, ErrorCode, WriteMode};
use crate::policy::{AccessPolicy, Action, Caller, Resource};
use crate::services::{deny_response, error_response, not_found_response, validation_response};

pub async fn update_task(
    service: &TaskService,
    request: &HttpRequest,
    id: i64,
    payload: TaskPayload,
    mode: WriteMode,
) -> ActixResult<HttpResponse> {
    let caller = Caller::from_request(request);
    if let Err(reason) =
        AccessPolicy::authorize(&caller, &Resource::Task, Action::Update).into_result()
    {
        return Ok(deny_response(reason));
    }

    let storage = service.get_storage(request);
    match storage.get_task_by_id(id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found_response(ErrorCode::TaskNotFound, "Task not found")),
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

    match storage.update_task(id, payload.into_changes()).await {
        Ok(Some(task)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            task,
            "Task updated successfully",
        ))),
        Ok(None) => Ok(not_found_response(ErrorCode::TaskNotFound, "Task not found")),
        Err(e) => Ok(error_response(e)),
    }
}
