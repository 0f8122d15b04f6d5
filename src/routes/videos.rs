use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::WriteMode;
use crate::models::videos::requests::{VideoListQuery, VideoPayload};
use crate::services::VideoService;
use crate::utils::SafeIDI64;

// 懒加载的全局 VideoService 实例
static VIDEO_SERVICE: Lazy<VideoService> = Lazy::new(VideoService::new_lazy);

pub async fn list_videos(
    req: HttpRequest,
    query: web::Query<VideoListQuery>,
) -> ActixResult<HttpResponse> {
    VIDEO_SERVICE.list_videos(&req, query.into_inner()).await
}

pub async fn create_video(
    req: HttpRequest,
    payload: web::Json<VideoPayload>,
) -> ActixResult<HttpResponse> {
    VIDEO_SERVICE.create_video(&req, payload.into_inner()).await
}

pub async fn get_video(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    VIDEO_SERVICE.get_video(&req, id.0).await
}

pub async fn replace_video(
    req: HttpRequest,
    id: SafeIDI64,
    payload: web::Json<VideoPayload>,
) -> ActixResult<HttpResponse> {
    VIDEO_SERVICE
        .update_video(&req, id.0, payload.into_inner(), WriteMode::Replace)
        .await
}

pub async fn patch_video(
    req: HttpRequest,
    id: SafeIDI64,
    payload: web::Json<VideoPayload>,
) -> ActixResult<HttpResponse> {
    VIDEO_SERVICE
        .update_video(&req, id.0, payload.into_inner(), WriteMode::Partial)
        .await
}

pub async fn delete_video(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    VIDEO_SERVICE.delete_video(&req, id.0).await
}

// 配置路由
pub fn configure_video_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/videos")
            .wrap(middlewares::OptionalJWT)
            .route("", web::get().to(list_videos))
            .route("", web::post().to(create_video))
            .route("/{id}", web::get().to(get_video))
            .route("/{id}", web::put().to(replace_video))
            .route("/{id}", web::patch().to(patch_video))
            .route("/{id}", web::delete().to(delete_video)),
    );
}
