use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TaskService, check_references};
use crate::models::tasks::requests::TaskPayload;
use crate::models::{ApiResponse, WriteMode};
use crate::policy::{AccessPolicy, Action, Caller, DenyReason, Resource};
use crate::services::{deny_response, error_response, validation_response};

pub async fn create_task(
    service: &TaskService,
    request: &HttpRequest,
    payload: TaskPayload,
) -> ActixResult<HttpResponse> {
    let caller = Caller::from_request(request);
    if let Err(reason) =
        AccessPolicy::authorize(&caller, &Resource::Task, Action::Create).into_result()
    {
        return Ok(deny_response(reason));
    }
    // 创建者恒为当前用户
    let Some(creator_id) = caller.user_id() else {
        return Ok(deny_response(DenyReason::AuthenticationRequired));
    };

    if let Err(errors) = payload.validate(WriteMode::Create) {
        return Ok(validation_response(errors));
    }

    let storage = service.get_storage(request);
    match check_references(storage.as_ref(), &caller, &payload).await {
        Ok(Some(errors)) => return Ok(validation_response(errors)),
        Ok(None) => {}
        Err(e) => return Ok(error_response(e)),
    }

    match storage.create_task(payload.into_new(creator_id)).await {
        Ok(task) => {
            tracing::info!("Task {} created by user {}", task.id, creator_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                task,
                "Task created successfully",
            )))
        }
        Err(e) => Ok(error_response(e)),
    }
}
