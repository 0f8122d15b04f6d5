//! 请求日志中间件
//!
//! 每个请求输出一行：`status | duration | client ip | METHOD "path?query"`，
//! 日志级别随状态码变化（>=500 error，>=400 warn，其余 info）。

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use super::rate_limit::extract_client_ip;

#[derive(Clone, Default)]
pub struct RequestLog;

/// 一次请求的摘要
struct RequestLine {
    method: String,
    target: String,
    client_ip: String,
}

impl RequestLine {
    fn from_request(req: &ServiceRequest) -> Self {
        let target = match req.query_string() {
            "" => req.path().to_string(),
            query => format!("{}?{}", req.path(), query),
        };
        Self {
            method: req.method().to_string(),
            target,
            client_ip: extract_client_ip(req),
        }
    }

    fn format(&self, status: StatusCode, elapsed: Duration) -> String {
        format!(
            "{} | {:.2}ms | {} | {} \"{}\"",
            status.as_u16(),
            elapsed.as_secs_f64() * 1000.0,
            self.client_ip,
            self.method,
            self.target
        )
    }

    fn emit(&self, status: StatusCode, elapsed: Duration) {
        let line = self.format(status, elapsed);
        if status.is_server_error() {
            error!("{}", line);
        } else if status.is_client_error() {
            warn!("{}", line);
        } else {
            info!("{}", line);
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLogMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLogMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestLogMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestLogMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
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
        let line = RequestLine::from_request(&req);
        let started = Instant::now();

        Box::pin(async move {
            let result = srv.call(req).await;
            let status = match &result {
                Ok(res) => res.status(),
                Err(err) => err.as_response_error().status_code(),
            };
            line.emit(status, started.elapsed());
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    #[::core::prelude::v1::test]
    fn test_line_format() {
        let line = RequestLine {
            method: "GET".into(),
            target: "/api/v1/topics?page=2".into(),
            client_ip: "10.0.0.1".into(),
        };
        let text = line.format(StatusCode::OK, Duration::from_micros(1500));
        assert_eq!(text, "200 | 1.50ms | 10.0.0.1 | GET \"/api/v1/topics?page=2\"");
    }

    #[actix_web::test]
    async fn test_passes_response_through() {
        let app = test::init_service(
            App::new()
                .wrap(RequestLog)
                .route("/teapot", web::get().to(|| async { HttpResponse::ImATeapot().finish() })),
        )
        .await;
        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/teapot").to_request()).await;
        assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
    }
}
