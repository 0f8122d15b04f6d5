use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::WriteMode;
use crate::models::submissions::requests::{SubmissionListQuery, SubmissionPayload};
use crate::services::SubmissionService;
use crate::utils::SafeIDI64;

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

pub async fn list_submissions(
    req: HttpRequest,
    query: web::Query<SubmissionListQuery>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_submissions(&req, query.into_inner())
        .await
}

pub async fn create_submission(
    req: HttpRequest,
    payload: web::Json<SubmissionPayload>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .create_submission(&req, payload.into_inner())
        .await
}

pub async fn get_submission(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.get_submission(&req, id.0).await
}

pub async fn replace_submission(
    req: HttpRequest,
    id: SafeIDI64,
    payload: web::Json<SubmissionPayload>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .update_submission(&req, id.0, payload.into_inner(), WriteMode::Replace)
        .await
}

pub async fn patch_submission(
    req: HttpRequest,
    id: SafeIDI64,
    payload: web::Json<SubmissionPayload>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .update_submission(&req, id.0, payload.into_inner(), WriteMode::Partial)
        .await
}

pub async fn delete_submission(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.delete_submission(&req, id.0).await
}

// 配置路由
pub fn configure_submission_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(middlewares::OptionalJWT)
            .route("", web::get().to(list_submissions))
            .route("", web::post().to(create_submission))
            .route("/{id}", web::get().to(get_submission))
            .route("/{id}", web::put().to(replace_submission))
            .route("/{id}", web::patch().to(patch_submission))
            .route("/{id}", web::delete().to(delete_submission)),
    );
}
