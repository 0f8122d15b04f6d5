use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::ApiResponse;
use crate::models::submissions::requests::SubmissionListQuery;
use crate::policy::{AccessPolicy, Action, Caller, Resource};
use crate::services::{deny_response, error_response};

pub async fn list_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    query: SubmissionListQuery,
) -> ActixResult<HttpResponse> {
    let caller = Caller::from_request(request);
    if let Err(reason) =
        AccessPolicy::authorize(&caller, &Resource::Submission(None), Action::List).into_result()
    {
        return Ok(deny_response(reason));
    }
    // 可见范围在分页之前生效
    let scope = match AccessPolicy::submission_scope(&caller) {
        Ok(scope) => scope,
        Err(reason) => return Ok(deny_response(reason)),
    };

    let storage = service.get_storage(request);
    match storage.list_submissions_with_pagination(scope, query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Submissions retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}
