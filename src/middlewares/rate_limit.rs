/*!
 * 速率限制中间件
 *
 * 固定时间窗口计数，超过限制返回 429 Too Many Requests。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App};
 * use crate::middlewares::RateLimit;
 *
 * App::new()
 *     .service(
 *         web::resource("/api/v1/auth/login")
 *             .wrap(RateLimit::login())  // 5次/分钟
 *             .route(web::post().to(login_handler))
 *     )
 * ```
 *
 * ## 限制键
 *
 * - 已认证请求按用户 ID 计数，否则按客户端 IP
 * - 每个预设使用独立的键前缀
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::Expiry;
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode, users::entities::User};

/// 单个限制键的计数窗口
#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    started: Instant,
    length: Duration,
}

impl Window {
    fn open(length: Duration) -> Self {
        Self {
            count: 1,
            started: Instant::now(),
            length,
        }
    }

    /// 计入一次请求；窗口过期则重新开窗
    fn hit(self, length: Duration) -> Self {
        if self.started.elapsed() < self.length {
            Self {
                count: self.count.saturating_add(1),
                ..self
            }
        } else {
            Self::open(length)
        }
    }

    fn retry_after(&self) -> u64 {
        self.length
            .saturating_sub(self.started.elapsed())
            .as_secs()
            .max(1)
    }
}

/// 窗口结束后条目自动过期
struct WindowExpiry;

impl Expiry<String, Window> for WindowExpiry {
    fn expire_after_create(&self, _key: &String, value: &Window, _created_at: Instant) -> Option<Duration> {
        Some(value.length)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Window,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.length.saturating_sub(value.started.elapsed()))
    }
}

/// 全局速率限制计数
/// 键: 前缀:标识，值: 当前窗口
static RATE_LIMIT_CACHE: Lazy<Cache<String, Window>> = Lazy::new(|| {
    Cache::builder()
        .expire_after(WindowExpiry)
        .max_capacity(100_000)
        .build()
});

/// 速率限制配置
#[derive(Clone)]
pub struct RateLimit {
    /// 时间窗口内允许的最大请求数
    max_requests: u32,
    /// 时间窗口（秒）
    window_secs: u64,
    /// 限制键前缀（用于区分不同端点）
    key_prefix: String,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            key_prefix: String::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录：5次/分钟
    pub fn login() -> Self {
        Self::new(5, 60).with_prefix("login")
    }

    /// 注册：3次/分钟
    pub fn register() -> Self {
        Self::new(3, 60).with_prefix("register")
    }

    /// 刷新令牌：10次/分钟
    pub fn refresh_token() -> Self {
        Self::new(10, 60).with_prefix("refresh")
    }

    /// 密码重置：3次/5分钟
    pub fn password_reset() -> Self {
        Self::new(3, 300).with_prefix("password_reset")
    }

    /// 文件上传：10次/分钟
    pub fn file_upload() -> Self {
        Self::new(10, 60).with_prefix("upload")
    }

    fn cache_key(&self, identifier: &str) -> String {
        if self.key_prefix.is_empty() {
            identifier.to_string()
        } else {
            format!("{}:{}", self.key_prefix, identifier)
        }
    }

    /// 计入一次请求，返回 (是否放行, 窗口)
    async fn admit(&self, identifier: &str) -> (bool, Window) {
        let length = Duration::from_secs(self.window_secs);
        let window = RATE_LIMIT_CACHE
            .entry(self.cache_key(identifier))
            .and_upsert_with(|existing| {
                let next = match existing {
                    Some(entry) => entry.into_value().hit(length),
                    None => Window::open(length),
                };
                ready(next)
            })
            .await
            .into_value();
        (window.count <= self.max_requests, window)
    }
}

/// 从请求中提取客户端 IP
///
/// 优先使用连接信息；部署在反向代理后时依赖 X-Forwarded-For / X-Real-IP。
pub(crate) fn extract_client_ip(req: &ServiceRequest) -> String {
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    if let Some(ref ip) = connection_ip
        && is_valid_ip(ip)
    {
        return ip.clone();
    }

    if let Some(forwarded) = req.headers().get("X-Forwarded-For")
        && let Ok(value) = forwarded.to_str()
        && let Some(ip) = value.split(',').next()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP")
        && let Ok(ip) = real_ip.to_str()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    connection_ip.unwrap_or_else(|| "unknown".to_string())
}

fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<std::net::IpAddr>().is_ok()
}

fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Request was throttled. Please try again later.",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: Rc::new(self.clone()),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: Rc<RateLimit>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let limit = self.limit.clone();

        Box::pin(async move {
            let user_id = req.extensions().get::<User>().map(|user| user.id);
            let identifier = match user_id {
                Some(id) => format!("user:{id}"),
                None => format!("ip:{}", extract_client_ip(&req)),
            };

            let (admitted, window) = limit.admit(&identifier).await;
            if !admitted {
                warn!(
                    "Rate limit exceeded for {} on {} ({}/{})",
                    identifier, limit.key_prefix, window.count, limit.max_requests
                );
                return Ok(req.into_response(
                    create_rate_limit_response(window.retry_after()).map_into_right_body(),
                ));
            }

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_presets() {
        let login = RateLimit::login();
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window_secs, 60);
        assert_eq!(login.key_prefix, "login");

        let reset = RateLimit::password_reset();
        assert_eq!(reset.max_requests, 3);
        assert_eq!(reset.window_secs, 300);

        assert_eq!(RateLimit::file_upload().max_requests, 10);
    }

    #[tokio::test]
    async fn test_admit_counts_within_window() {
        let limit = RateLimit::new(2, 60).with_prefix("test_admit");
        assert!(limit.admit("ip:10.0.0.1").await.0);
        assert!(limit.admit("ip:10.0.0.1").await.0);
        let (admitted, window) = limit.admit("ip:10.0.0.1").await;
        assert!(!admitted);
        assert_eq!(window.count, 3);
        // 不同标识独立计数
        assert!(limit.admit("ip:10.0.0.2").await.0);
    }

    #[test]
    fn test_window_reopens_after_expiry() {
        let stale = Window {
            count: 9,
            started: Instant::now() - Duration::from_secs(120),
            length: Duration::from_secs(60),
        };
        assert_eq!(stale.hit(Duration::from_secs(60)).count, 1);
    }
}
