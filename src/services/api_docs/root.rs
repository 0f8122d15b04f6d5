use std::collections::BTreeMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::config::AppConfig;
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::models::api::ApiRootResponse;

/// 入口集合：名称 → 相对 `/api/v1` 的路径
const ENTRY_POINTS: &[(&str, &str)] = &[
    ("auth", "auth/me"),
    ("files", "files/upload"),
    ("schema", "schema"),
    ("submissions", "submissions"),
    ("tasks", "tasks"),
    ("topics", "topics"),
    ("users", "users"),
    ("videos", "videos"),
];

pub async fn get_root(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let username = RequireJWT::extract_user(request)
        .map(|user| user.username)
        .unwrap_or_default();

    let info = request.connection_info();
    let base = format!("{}://{}/api/v1", info.scheme(), info.host());
    let endpoints: BTreeMap<String, String> = ENTRY_POINTS
        .iter()
        .map(|(name, path)| (name.to_string(), format!("{base}/{path}")))
        .collect();

    let response = ApiRootResponse {
        message: format!("Welcome to the {} API", AppConfig::get().app.system_name),
        username,
        endpoints,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "OK")))
}
