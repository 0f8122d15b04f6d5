//! 密码重置
//!
//! 令牌按用户保存在对象缓存中（`password_reset:{id}`），有效期由
//! `password_reset.token_ttl` 决定；确认成功后立即作废。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::cache::password_reset_cache_key;
use crate::errors::CourseHubError;
use crate::models::auth::{PasswordResetConfirmRequest, PasswordResetRequest};
use crate::models::users::requests::UpdateUserRequest;
use crate::models::{ApiResponse, ErrorCode, FieldErrors};
use crate::services::{error_response, validation_response};
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_reset_token;
use crate::utils::validate::normalize_email;

use super::mailer::password_reset_message;
use super::{AuthService, password_pair_errors};

const INVALID_RESET_LINK: &str = "The reset link is invalid or has expired.";

fn cache_unavailable() -> HttpResponse {
    error_response(CourseHubError::cache_connection(
        "Object cache not found in app data",
    ))
}

pub async fn handle_request_reset(
    service: &AuthService,
    reset_request: PasswordResetRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let email = normalize_email(&reset_request.email);
    let storage = service.get_storage(request);

    let user = match storage.get_user_by_email(&email).await {
        Ok(Some(user)) if user.is_active => user,
        Ok(_) => {
            return Ok(validation_response(FieldErrors::single(
                "email",
                "User with this email does not exist.",
            )));
        }
        Err(e) => return Ok(error_response(e)),
    };

    let Some(cache) = service.get_cache(request) else {
        return Ok(cache_unavailable());
    };

    let config = service.get_config();
    let token = generate_reset_token();
    cache
        .insert_raw(
            password_reset_cache_key(user.id),
            token.clone(),
            config.password_reset.token_ttl,
        )
        .await;

    let link = format!(
        "{}/{}/{}",
        config.password_reset.frontend_url.trim_end_matches('/'),
        user.id,
        token
    );
    let message = password_reset_message(&user.email, &link, &config.app.system_name);
    if let Err(e) = service.get_mailer(request).send(message).await {
        cache.remove(&password_reset_cache_key(user.id)).await;
        return Ok(error_response(e));
    }

    tracing::info!("Password reset requested for user {}", user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Password reset link has been sent to your email",
    )))
}

pub async fn handle_confirm_reset(
    service: &AuthService,
    user_id: i64,
    token: String,
    confirm_request: PasswordResetConfirmRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(errors) =
        password_pair_errors(&confirm_request.password, &confirm_request.password2).into_result()
    {
        return Ok(validation_response(errors));
    }

    let Some(cache) = service.get_cache(request) else {
        return Ok(cache_unavailable());
    };

    // 令牌只能使用一次：先原子地比较并删除，再修改密码
    let key = password_reset_cache_key(user_id);
    if !cache.remove_if_eq(&key, &token).await {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PasswordResetFailed,
            INVALID_RESET_LINK,
        )));
    }

    let password_hash = match hash_password(&confirm_request.password) {
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
            tracing::info!("Password reset completed for user {}", user_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Password has been reset successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PasswordResetFailed,
            INVALID_RESET_LINK,
        ))),
        Err(e) => Ok(error_response(e)),
    }
}
