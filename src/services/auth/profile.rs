use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireJWT;
use crate::models::auth::{ChangePasswordRequest, UserInfoResponse};
use crate::models::users::requests::UpdateUserRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::DenyReason;
use crate::services::{deny_response, error_response, not_found_response, validation_response};
use crate::utils::password::hash_password;

use super::{AuthService, password_pair_errors};

pub async fn handle_get_user(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match RequireJWT::extract_user(request) {
        Some(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserInfoResponse { user },
            "User information retrieved successfully",
        ))),
        None => Ok(deny_response(DenyReason::AuthenticationRequired)),
    }
}

pub async fn handle_change_password(
    service: &AuthService,
    change_request: ChangePasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(deny_response(DenyReason::AuthenticationRequired));
    };

    if let Err(errors) =
        password_pair_errors(&change_request.password, &change_request.password2).into_result()
    {
        return Ok(validation_response(errors));
    }

    let password_hash = match hash_password(&change_request.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(error_response(e)),
    };

    let storage = service.get_storage(request);
    let update = UpdateUserRequest {
        password_hash: Some(password_hash),
        ..Default::default()
    };
    match storage.update_user(user_id, update).await {
        Ok(Some(_)) => {
            service.invalidate_user(request, user_id).await;
            tracing::info!("User {} changed password", user_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Password updated successfully",
            )))
        }
        Ok(None) => Ok(not_found_response(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(error_response(e)),
    }
}
