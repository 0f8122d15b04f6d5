use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::services::ApiDocsService;

static API_DOCS_SERVICE: Lazy<ApiDocsService> = Lazy::new(ApiDocsService::new_lazy);

pub async fn get_root(request: HttpRequest) -> ActixResult<HttpResponse> {
    API_DOCS_SERVICE.get_root(&request).await
}

pub async fn get_schema(request: HttpRequest) -> ActixResult<HttpResponse> {
    API_DOCS_SERVICE.get_schema(&request).await
}

// 使用独立资源而非 `/api/v1` scope，避免遮蔽其他路由
pub fn configure_api_docs_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(["/api/v1", "/api/v1/"])
            .wrap(middlewares::OptionalJWT)
            .route(web::get().to(get_root)),
    )
    .service(
        web::resource("/api/v1/schema")
            .wrap(middlewares::OptionalJWT)
            .route(web::get().to(get_schema)),
    );
}
