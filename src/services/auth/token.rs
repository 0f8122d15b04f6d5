use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::auth::{RefreshTokenRequest, RefreshTokenResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::utils::jwt::JwtUtils;

use super::AuthService;

fn invalid_refresh(message: &str) -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(ErrorCode::Unauthorized, message))
}

// 刷新 access token：refresh token 优先取请求体，其次取 cookie
pub async fn handle_refresh_token(
    service: &AuthService,
    refresh_request: RefreshTokenRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(refresh_token) = refresh_request
        .refresh
        .filter(|token| !token.is_empty())
        .or_else(|| JwtUtils::extract_refresh_token_from_cookie(request))
    else {
        return Ok(invalid_refresh("Refresh token not provided"));
    };

    let user_id = match JwtUtils::verify_refresh_token(&refresh_token).and_then(|c| c.user_id()) {
        Ok(id) => id,
        Err(e) => {
            tracing::info!("Refresh token rejected: {}", e);
            return Ok(invalid_refresh("Token is invalid or expired"));
        }
    };

    // 令牌签发后用户可能已被停用，需要重新读取
    let storage = service.get_storage(request);
    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.is_active => user,
        Ok(_) => return Ok(invalid_refresh("User not found or inactive")),
        Err(e) => return Ok(error_response(e)),
    };

    let config = service.get_config();
    match JwtUtils::generate_access_token(user.id, &user.role().to_string()) {
        Ok(access_token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token,
                expires_in: config.jwt.access_token_expiry * 60,
            },
            "Token refreshed successfully",
        ))),
        Err(e) => Ok(error_response(e.into())),
    }
}
