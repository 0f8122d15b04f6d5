use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TaskService;
use crate::models::ApiResponse;
use crate::models::tasks::requests::TaskListQuery;
use crate::policy::{AccessPolicy, Action, Caller, Resource};
use crate::services::{deny_response, error_response};

pub async fn list_tasks(
    service: &TaskService,
    request: &HttpRequest,
    query: TaskListQuery,
) -> ActixResult<HttpResponse> {
    let caller = Caller::from_request(request);
    if let Err(reason) = AccessPolicy::authorize(&caller, &Resource::Task, Action::List).into_result()
    {
        return Ok(deny_response(reason));
    }

    let storage = service.get_storage(request);
    match storage.list_tasks_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Tasks retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}
