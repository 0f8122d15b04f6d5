//! 路径参数提取器
//!
//! 非法参数直接返回 400 统一响应，处理函数拿到的总是合法值。

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse};

use crate::models::{ApiResponse, ErrorCode};

fn bad_path(message: impl Into<String>) -> actix_web::Error {
    let message = message.into();
    InternalError::from_response(
        message.clone(),
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}

/// 路径中的正整数 ID（`{id}`）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("id").unwrap_or_default();
        ready(
            raw.parse::<i64>()
                .ok()
                .filter(|id| *id > 0)
                .map(SafeIDI64)
                .ok_or_else(|| bad_path(format!("Invalid id: {raw}"))),
        )
    }
}

/// 文件下载令牌（`{token}`），只允许字母、数字与连字符
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeFileToken(pub String);

impl FromRequest for SafeFileToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("token").unwrap_or_default();
        let valid = !raw.is_empty()
            && raw.len() <= 64
            && raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        ready(if valid {
            Ok(SafeFileToken(raw.to_string()))
        } else {
            Err(bad_path("Invalid file token"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    async fn extract_id(value: &str) -> Result<SafeIDI64, actix_web::Error> {
        let req = TestRequest::default()
            .param("id", value.to_string())
            .to_http_request();
        SafeIDI64::extract(&req).await
    }

    #[actix_web::test]
    async fn test_positive_ids_only() {
        assert_eq!(extract_id("42").await.ok(), Some(SafeIDI64(42)));
        assert!(extract_id("0").await.is_err());
        assert!(extract_id("-3").await.is_err());
        assert!(extract_id("abc").await.is_err());
    }

    #[actix_web::test]
    async fn test_file_token_charset() {
        let req = TestRequest::default()
            .param("token", "0b7c9a4e-4bd1-4f0e-9d7e-2a52f4d2a0b1")
            .to_http_request();
        assert!(SafeFileToken::extract(&req).await.is_ok());

        let req = TestRequest::default()
            .param("token", "../etc/passwd")
            .to_http_request();
        assert!(SafeFileToken::extract(&req).await.is_err());
    }
}
