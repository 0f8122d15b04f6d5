pub mod login;
pub mod logout;
pub mod mailer;
pub mod password_reset;
pub mod profile;
pub mod register;
pub mod token;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::cache::{ObjectCache, user_cache_key};
use crate::config::AppConfig;
use crate::models::FieldErrors;
use crate::models::auth::{
    ChangePasswordRequest, LoginRequest, PasswordResetConfirmRequest, PasswordResetRequest,
    RefreshTokenRequest, RegisterRequest,
};
use crate::storage::Storage;
use crate::utils::validate::validate_password_pair;

pub use mailer::{LoggingMailer, MailMessage, Mailer};

pub struct AuthService {
    storage: Option<Arc<dyn Storage>>,
}

impl AuthService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => super::storage_from_request(request),
        }
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
        super::cache_from_request(request)
    }

    pub(crate) fn get_mailer(&self, request: &HttpRequest) -> Arc<dyn Mailer> {
        request
            .app_data::<web::Data<Arc<dyn Mailer>>>()
            .map(|data| data.get_ref().clone())
            .unwrap_or_else(|| Arc::new(LoggingMailer))
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    /// 账户变更后使认证缓存失效
    pub(crate) async fn invalidate_user(&self, request: &HttpRequest, user_id: i64) {
        if let Some(cache) = self.get_cache(request) {
            cache.remove(&user_cache_key(user_id)).await;
        }
    }

    // 登录验证
    pub async fn login(
        &self,
        login_request: LoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, login_request, request).await
    }

    // 用户注册
    pub async fn register(
        &self,
        register_request: RegisterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        register::handle_register(self, register_request, request).await
    }

    // 刷新令牌
    pub async fn refresh_token(
        &self,
        refresh_request: RefreshTokenRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        token::handle_refresh_token(self, refresh_request, request).await
    }

    // 注销
    pub async fn logout(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        logout::handle_logout(self, request).await
    }

    // 当前用户信息
    pub async fn get_user(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        profile::handle_get_user(self, request).await
    }

    // 修改密码
    pub async fn change_password(
        &self,
        change_request: ChangePasswordRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        profile::handle_change_password(self, change_request, request).await
    }

    // 申请重置密码
    pub async fn request_password_reset(
        &self,
        reset_request: PasswordResetRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        password_reset::handle_request_reset(self, reset_request, request).await
    }

    // 确认重置密码
    pub async fn confirm_password_reset(
        &self,
        user_id: i64,
        token: String,
        confirm_request: PasswordResetConfirmRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        password_reset::handle_confirm_reset(self, user_id, token, confirm_request, request).await
    }
}

/// 两次密码输入的字段级校验
pub(crate) fn password_pair_errors(password: &str, password2: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for (field, message) in validate_password_pair(password, password2) {
        errors.add(field, message);
    }
    errors
}
