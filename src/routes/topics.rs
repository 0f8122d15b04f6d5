use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::WriteMode;
use crate::models::topics::requests::{TopicListQuery, TopicPayload};
use crate::services::TopicService;
use crate::utils::SafeIDI64;

// 懒加载的全局 TopicService 实例
static TOPIC_SERVICE: Lazy<TopicService> = Lazy::new(TopicService::new_lazy);

pub async fn list_topics(
    req: HttpRequest,
    query: web::Query<TopicListQuery>,
) -> ActixResult<HttpResponse> {
    TOPIC_SERVICE.list_topics(&req, query.into_inner()).await
}

pub async fn create_topic(
    req: HttpRequest,
    payload: web::Json<TopicPayload>,
) -> ActixResult<HttpResponse> {
    TOPIC_SERVICE.create_topic(&req, payload.into_inner()).await
}

pub async fn get_topic(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TOPIC_SERVICE.get_topic(&req, id.0).await
}

pub async fn replace_topic(
    req: HttpRequest,
    id: SafeIDI64,
    payload: web::Json<TopicPayload>,
) -> ActixResult<HttpResponse> {
    TOPIC_SERVICE
        .update_topic(&req, id.0, payload.into_inner(), WriteMode::Replace)
        .await
}

pub async fn patch_topic(
    req: HttpRequest,
    id: SafeIDI64,
    payload: web::Json<TopicPayload>,
) -> ActixResult<HttpResponse> {
    TOPIC_SERVICE
        .update_topic(&req, id.0, payload.into_inner(), WriteMode::Partial)
        .await
}

pub async fn delete_topic(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TOPIC_SERVICE.delete_topic(&req, id.0).await
}

pub async fn get_topic_videos(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TOPIC_SERVICE.get_topic_videos(&req, id.0).await
}

pub async fn get_topic_tasks(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TOPIC_SERVICE.get_topic_tasks(&req, id.0).await
}

// 配置路由
pub fn configure_topic_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/topics")
            .wrap(middlewares::OptionalJWT)
            .route("", web::get().to(list_topics))
            .route("", web::post().to(create_topic))
            .route("/{id}", web::get().to(get_topic))
            .route("/{id}", web::put().to(replace_topic))
            .route("/{id}", web::patch().to(patch_topic))
            .route("/{id}", web::delete().to(delete_topic))
            .route("/{id}/videos", web::get().to(get_topic_videos))
            .route("/{id}/tasks", web::get().to(get_topic_tasks)),
    );
}
