use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};

use crate::models::users::entities::User;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{AuthTokens, LoginRequest, LoginResponse},
};
use crate::services::error_response;
use crate::utils::jwt;
use crate::utils::password::verify_password;
use crate::utils::validate::normalize_email;

use super::AuthService;

const BAD_CREDENTIALS: &str = "No active account found with the given credentials";

/// 签发令牌对并构造登录 / 注册响应，refresh token 同时写入 cookie
pub(crate) fn session_response(
    service: &AuthService,
    user: User,
    remember_me: bool,
    status: StatusCode,
    message: &str,
) -> HttpResponse {
    let config = service.get_config();
    let refresh_expiry = remember_me
        .then(|| chrono::Duration::days(config.jwt.refresh_token_remember_me_expiry));

    match user.generate_token_pair(refresh_expiry) {
        Ok(token_pair) => {
            let refresh_cookie =
                jwt::JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token);
            let response = LoginResponse {
                tokens: AuthTokens {
                    access: token_pair.access_token,
                    refresh: token_pair.refresh_token,
                },
                expires_in: config.jwt.access_token_expiry * 60, // 转换为秒
                user,
                created_at: chrono::Utc::now(),
            };
            HttpResponse::build(status)
                .cookie(refresh_cookie)
                .json(ApiResponse::success(response, message))
        }
        Err(e) => {
            tracing::error!("Failed to generate JWT token: {}", e);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Unable to generate token",
            ))
        }
    }
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let email = normalize_email(&login_request.email);

    // 1. 根据邮箱获取用户
    let user = match storage.get_user_by_email(&email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::AuthFailed,
                BAD_CREDENTIALS,
            )));
        }
        Err(e) => return Ok(error_response(e)),
    };

    // 2. 验证密码与账户状态
    if !verify_password(&login_request.password, &user.password_hash) || !user.is_active {
        tracing::info!("Failed login attempt for {}", email);
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            BAD_CREDENTIALS,
        )));
    }

    // 3. 更新最后登录时间
    if let Err(e) = storage.update_last_login(user.id).await {
        tracing::warn!("Failed to update last login for user {}: {}", user.id, e);
    }

    tracing::info!("User {} logged in successfully", user.username);
    Ok(session_response(
        service,
        user,
        login_request.remember_me,
        StatusCode::OK,
        "Login successful",
    ))
}
