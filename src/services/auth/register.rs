use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};

use crate::models::auth::RegisterRequest;
use crate::models::users::requests::CreateUserRequest;
use crate::models::{ApiResponse, ErrorCode, FieldErrors};
use crate::services::{error_response, validation_response};
use crate::utils::password::hash_password;
use crate::utils::validate::{normalize_email, validate_email, validate_username};

use super::login::session_response;
use super::{AuthService, password_pair_errors};

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let username = register_request.username.trim().to_string();
    let email = normalize_email(&register_request.email);

    // 字段校验
    let mut errors = FieldErrors::new();
    if let Err(msg) = validate_username(&username) {
        errors.add("username", msg);
    }
    if let Err(msg) = validate_email(&email) {
        errors.add("email", msg);
    }
    errors.merge(password_pair_errors(
        &register_request.password,
        &register_request.password2,
    ));
    if let Err(errors) = errors.into_result() {
        return Ok(validation_response(errors));
    }

    let storage = service.get_storage(request);

    // 唯一性检查
    match storage.get_user_by_username(&username).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserNameAlreadyExists,
                "A user with that username already exists.",
            )));
        }
        Ok(None) => {}
        Err(e) => return Ok(error_response(e)),
    }
    match storage.get_user_by_email(&email).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserEmailAlreadyExists,
                "A user with that email already exists.",
            )));
        }
        Ok(None) => {}
        Err(e) => return Ok(error_response(e)),
    }

    let password_hash = match hash_password(&register_request.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(error_response(e)),
    };

    let user = match storage
        .create_user(CreateUserRequest {
            email,
            username,
            password_hash,
            is_staff: false,
            is_superuser: false,
        })
        .await
    {
        Ok(user) => user,
        Err(e) => return Ok(error_response(e)),
    };

    tracing::info!("User {} registered", user.username);
    Ok(session_response(
        service,
        user,
        false,
        StatusCode::CREATED,
        "Registration successful",
    ))
}
