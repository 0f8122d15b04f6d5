use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{AccessPolicy, Action, Caller, Ownership, Resource};
use crate::services::{deny_response, error_response, not_found_response};

pub async fn delete_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let caller = Caller::from_request(request);
    let scope = match AccessPolicy::submission_scope(&caller) {
        Ok(scope) => scope,
        Err(reason) => return Ok(deny_response(reason)),
    };

    let storage = service.get_storage(request);
    let existing = match storage.get_submission_by_id(id, scope).await {
        Ok(Some(submission)) => submission,
        Ok(None) => {
            return Ok(not_found_response(
                ErrorCode::SubmissionNotFound,
                "Submission not found",
            ));
        }
        Err(e) => return Ok(error_response(e)),
    };

    let target = Resource::Submission(Some(Ownership {
        owner_id: existing.user_id,
    }));
    if let Err(reason) = AccessPolicy::authorize(&caller, &target, Action::Delete).into_result() {
        return Ok(deny_response(reason));
    }

    match storage.delete_submission(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Submission deleted successfully",
        ))),
        Ok(false) => Ok(not_found_response(
            ErrorCode::SubmissionNotFound,
            "Submission not found",
        )),
        Err(e) => Ok(error_response(e)),
    }
}
