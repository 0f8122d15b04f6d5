use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubmissionService, check_references};
use crate::models::submissions::requests::SubmissionPayload;
use crate::models::{ApiResponse, WriteMode};
use crate::policy::{AccessPolicy, Action, Caller, DenyReason, FieldMask, Resource};
use crate::services::{deny_response, error_response, validation_response};

pub async fn create_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    payload: SubmissionPayload,
) -> ActixResult<HttpResponse> {
    let caller = Caller::from_request(request);
    let mask = match AccessPolicy::authorize(&caller, &Resource::Submission(None), Action::Create)
        .into_result()
    {
        Ok(mask) => mask.unwrap_or(FieldMask::CREATE),
        Err(reason) => return Ok(deny_response(reason)),
    };

    if let Err(errors) = payload.validate(WriteMode::Create) {
        return Ok(validation_response(errors));
    }

    if let Some(forged) = payload.user_id.as_ref() {
        tracing::debug!(
            "Ignoring user {} in submission payload from user {:?}",
            forged,
            caller.user_id()
        );
    }
    let write = match AccessPolicy::narrow_submission_write(&caller, mask, Action::Create, payload)
    {
        Ok(write) => write,
        Err(errors) => return Ok(validation_response(errors)),
    };

    let storage = service.get_storage(request);
    match check_references(storage.as_ref(), &caller, &write).await {
        Ok(Some(errors)) => return Ok(validation_response(errors)),
        Ok(None) => {}
        Err(e) => return Ok(error_response(e)),
    }

    let Some(new_submission) = write.into_new() else {
        return Ok(deny_response(DenyReason::AuthenticationRequired));
    };

    match storage.create_submission(new_submission).await {
        Ok(submission) => {
            tracing::info!(
                "Submission {} created for task {} by user {}",
                submission.id,
                submission.task_id,
                submission.user_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                submission,
                "Submission created successfully",
            )))
        }
        Err(e) => Ok(error_response(e)),
    }
}
