/*!
 * JWT 认证中间件
 *
 * - `RequireJWT`：必须携带有效的 access token，否则返回 401
 * - `OptionalJWT`：未携带 token 时以匿名身份继续，携带但无效时仍返回 401
 *
 * 认证成功后，用户写入请求扩展，处理程序通过 `Caller::from_request`
 * 或 [`RequireJWT::extract_user`] 读取。
 *
 * ```rust,ignore
 * web::scope("/api/v1/topics")
 *     .wrap(middlewares::OptionalJWT)
 *     .route("", web::get().to(list_topics))
 * ```
 *
 * ## 认证流程
 *
 * 1. 客户端在请求头中包含 `Authorization: Bearer <JWT_TOKEN>`
 * 2. 校验签名、过期时间与 token 类型
 * 3. 按 `user:{id}` 从缓存读取用户，未命中时查询存储并回填
 * 4. 用户必须处于激活状态
 */

use crate::cache::{ObjectCache, user_cache_key};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::User;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const MISSING_CREDENTIALS: &str = "Authentication credentials were not provided.";
const INVALID_TOKEN: &str = "Given token not valid for any token type";

#[derive(Clone)]
pub struct RequireJWT;

#[derive(Clone)]
pub struct OptionalJWT;

enum AuthOutcome {
    Anonymous,
    Authenticated(User),
    Rejected(StatusCode, String),
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

// 按 ID 加载用户：先查缓存，未命中查存储并回填
async fn load_user(req: &ServiceRequest, user_id: i64) -> Result<Option<User>, String> {
    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone());

    if let Some(cache) = &cache
        && let Some(user) = cache.get_json::<User>(&user_cache_key(user_id)).await
    {
        return Ok(Some(user));
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| "Storage not found in app data".to_string())?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|e| format!("Failed to retrieve user from storage: {e}"))?;

    if let (Some(cache), Some(user)) = (&cache, &user) {
        cache
            .insert_json(user_cache_key(user_id), user, AppConfig::get().cache.default_ttl)
            .await;
    }

    Ok(user)
}

async fn authenticate(req: &ServiceRequest) -> AuthOutcome {
    let Some(token) = bearer_token(req) else {
        return AuthOutcome::Anonymous;
    };

    let user_id = match JwtUtils::verify_access_token(token).and_then(|c| c.user_id()) {
        Ok(id) => id,
        Err(err) => {
            info!("JWT token validation failed: {}", err);
            return AuthOutcome::Rejected(StatusCode::UNAUTHORIZED, INVALID_TOKEN.to_string());
        }
    };

    match load_user(req, user_id).await {
        Ok(Some(user)) if user.is_active => AuthOutcome::Authenticated(user),
        Ok(Some(_)) => {
            AuthOutcome::Rejected(StatusCode::UNAUTHORIZED, "User is inactive".to_string())
        }
        Ok(None) => AuthOutcome::Rejected(StatusCode::UNAUTHORIZED, "User not found".to_string()),
        Err(err) => {
            error!("{}", err);
            AuthOutcome::Rejected(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Authentication backend unavailable".to_string(),
            )
        }
    }
}

macro_rules! jwt_transform {
    ($name:ident, $required:expr) => {
        impl<S, B> Transform<S, ServiceRequest> for $name
        where
            S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
            B: 'static,
        {
            type Response = ServiceResponse<EitherBody<B>>;
            type Error = Error;
            type InitError = ();
            type Transform = JwtMiddleware<S>;
            type Future = Ready<Result<Self::Transform, Self::InitError>>;

            fn new_transform(&self, service: S) -> Self::Future {
                ready(Ok(JwtMiddleware {
                    service: Rc::new(service),
                    required: $required,
                }))
            }
        }
    };
}

jwt_transform!(RequireJWT, true);
jwt_transform!(OptionalJWT, false);

pub struct JwtMiddleware<S> {
    service: Rc<S>,
    required: bool,
}

impl<S, B> Service<ServiceRequest> for JwtMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let required = self.required;
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match authenticate(&req).await {
                AuthOutcome::Authenticated(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                AuthOutcome::Anonymous if !required => {
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                AuthOutcome::Anonymous => Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        MISSING_CREDENTIALS,
                    )
                    .map_into_right_body(),
                )),
                AuthOutcome::Rejected(status, err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    let code = if status == StatusCode::UNAUTHORIZED {
                        ErrorCode::Unauthorized
                    } else {
                        ErrorCode::InternalServerError
                    };
                    Ok(req.into_response(
                        create_error_response(status, code, &err).map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取用户信息
impl RequireJWT {
    /// 从请求扩展中提取当前用户
    pub fn extract_user(req: &HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    /// 从请求扩展中提取用户ID
    pub fn extract_user_id(req: &HttpRequest) -> Option<i64> {
        req.extensions().get::<User>().map(|user| user.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::models::users::requests::UpdateUserRequest;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, test_support};
    use actix_web::{App, HttpResponse, test};

    async fn whoami(req: HttpRequest) -> HttpResponse {
        match RequireJWT::extract_user(&req) {
            Some(user) => HttpResponse::Ok().body(user.username),
            None => HttpResponse::Ok().body("anonymous"),
        }
    }

    async fn fixtures() -> (Arc<dyn Storage>, Arc<dyn ObjectCache>, User) {
        let storage: SeaOrmStorage = test_support::storage().await;
        let user = test_support::user(&storage, "alice", false).await;
        let storage: Arc<dyn Storage> = Arc::new(storage);
        let cache: Arc<dyn ObjectCache> =
            Arc::new(MokaCacheWrapper::with_settings(100, 60));
        (storage, cache, user)
    }

    macro_rules! app {
        ($storage:expr, $cache:expr, $mw:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($storage.clone()))
                    .app_data(web::Data::new($cache.clone()))
                    .service(web::scope("/whoami").wrap($mw).route("", web::get().to(whoami))),
            )
            .await
        };
    }

    fn bearer(user: &User) -> (&'static str, String) {
        let pair = user.generate_token_pair(None).expect("sign");
        ("Authorization", format!("Bearer {}", pair.access_token))
    }

    #[actix_web::test]
    async fn test_required_rejects_missing_token() {
        let (storage, cache, _) = fixtures().await;
        let app = app!(storage, cache, RequireJWT);
        let resp = test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request())
            .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_optional_allows_anonymous() {
        let (storage, cache, _) = fixtures().await;
        let app = app!(storage, cache, OptionalJWT);
        let resp = test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request())
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, "anonymous");
    }

    #[actix_web::test]
    async fn test_optional_still_rejects_bad_token() {
        let (storage, cache, _) = fixtures().await;
        let app = app!(storage, cache, OptionalJWT);
        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_valid_token_attaches_user() {
        let (storage, cache, user) = fixtures().await;
        let app = app!(storage, cache, RequireJWT);
        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(bearer(&user))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, "alice");
        assert!(
            cache
                .get_json::<User>(&user_cache_key(user.id))
                .await
                .is_some()
        );
    }

    #[actix_web::test]
    async fn test_refresh_token_is_not_an_access_token() {
        let (storage, cache, user) = fixtures().await;
        let app = app!(storage, cache, RequireJWT);
        let pair = user.generate_token_pair(None).expect("sign");
        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", pair.refresh_token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_inactive_user_is_rejected() {
        let (storage, cache, user) = fixtures().await;
        storage
            .update_user(
                user.id,
                UpdateUserRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .expect("deactivate");
        let app = app!(storage, cache, RequireJWT);
        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(bearer(&user))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
