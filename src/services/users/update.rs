use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::users::requests::UpdateUserPrivilegesRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{AccessPolicy, Action, Caller, Resource};
use crate::services::{deny_response, error_response, not_found_response};

// 修改权限标记与激活状态（仅超级管理员）
pub async fn update_privileges(
    service: &UserService,
    request: &HttpRequest,
    id: i64,
    update: UpdateUserPrivilegesRequest,
) -> ActixResult<HttpResponse> {
    let caller = Caller::from_request(request);
    if let Err(reason) =
        AccessPolicy::authorize(&caller, &Resource::UserAccount(Some(id)), Action::Update)
            .into_result()
    {
        return Ok(deny_response(reason));
    }

    if update.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "No fields to update",
        )));
    }

    // 不能撤销自己的超级管理员身份
    if caller.is(id) && (update.is_superuser == Some(false) || update.is_active == Some(false)) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::UserUpdateFailed,
            "You cannot revoke your own superuser access",
        )));
    }

    let storage = service.get_storage(request);
    match storage.update_user(id, update.into()).await {
        Ok(Some(user)) => {
            service.invalidate_user(request, id).await;
            tracing::info!(
                "User {} privileges updated by {:?}: staff={}, superuser={}, active={}",
                id,
                caller.user_id(),
                user.is_staff,
                user.is_superuser,
                user.is_active
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                user,
                "User updated successfully",
            )))
        }
        Ok(None) => Ok(not_found_response(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(error_response(e)),
    }
}
