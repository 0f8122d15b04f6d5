use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubmissionService, check_references};
use crate::models::submissions::requests::SubmissionPayload;
use crate::models::{ApiResponse, ErrorCode, WriteMode};
use crate::policy::{AccessPolicy, Action, Caller, FieldMask, Ownership, Resource};
use crate::services::{deny_response, error_response, not_found_response, validation_response};

pub async fn update_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    id: i64,
    payload: SubmissionPayload,
    mode: WriteMode,
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
    let mask = match AccessPolicy::authorize(&caller, &target, Action::Update).into_result() {
        Ok(mask) => mask.unwrap_or(FieldMask::OWNER_UPDATE),
        Err(reason) => return Ok(deny_response(reason)),
    };

    if let Err(errors) = payload.validate(mode) {
        return Ok(validation_response(errors));
    }

    // 掩码外的字段（如非教职人员的 grade）被静默丢弃
    if let Some(forged) = payload.user_id.as_ref() {
        tracing::debug!(
            "Ignoring user {} in submission {} update from user {:?}",
            forged,
            id,
            caller.user_id()
        );
    }
    let write = match AccessPolicy::narrow_submission_write(&caller, mask, Action::Update, payload)
    {
        Ok(write) => write,
        Err(errors) => return Ok(validation_response(errors)),
    };
    match check_references(storage.as_ref(), &caller, &write).await {
        Ok(Some(errors)) => return Ok(validation_response(errors)),
        Ok(None) => {}
        Err(e) => return Ok(error_response(e)),
    }

    let graded = write.grade.is_some();
    match storage.update_submission(id, write.into_changes()).await {
        Ok(Some(submission)) => {
            if graded {
                tracing::info!(
                    "Submission {} graded {:?} by user {:?}",
                    submission.id,
                    submission.grade,
                    caller.user_id()
                );
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                submission,
                "Submission updated successfully",
            )))
        }
        Ok(None) => Ok(not_found_response(
            ErrorCode::SubmissionNotFound,
            "Submission not found",
        )),
        Err(e) => Ok(error_response(e)),
    }
}
