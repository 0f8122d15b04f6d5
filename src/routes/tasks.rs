use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::WriteMode;
use crate::models::tasks::requests::{TaskListQuery, TaskPayload};
use crate::services::TaskService;
use crate::utils::SafeIDI64;

// 懒加载的全局 TaskService 实例
static TASK_SERVICE: Lazy<TaskService> = Lazy::new(TaskService::new_lazy);

pub async fn list_tasks(
    req: HttpRequest,
    query: web::Query<TaskListQuery>,
) -> ActixResult<HttpResponse> {
    TASK_SERVICE.list_tasks(&req, query.into_inner()).await
}

pub async fn create_task(
    req: HttpRequest,
    payload: web::Json<TaskPayload>,
) -> ActixResult<HttpResponse> {
    TASK_SERVICE.create_task(&req, payload.into_inner()).await
}

pub async fn get_task(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TASK_SERVICE.get_task(&req, id.0).await
}

pub async fn replace_task(
    req: HttpRequest,
    id: SafeIDI64,
    payload: web::Json<TaskPayload>,
) -> ActixResult<HttpResponse> {
    TASK_SERVICE
        .update_task(&req, id.0, payload.into_inner(), WriteMode::Replace)
        .await
}

pub async fn patch_task(
    req: HttpRequest,
    id: SafeIDI64,
    payload: web::Json<TaskPayload>,
) -> ActixResult<HttpResponse> {
    TASK_SERVICE
        .update_task(&req, id.0, payload.into_inner(), WriteMode::Partial)
        .await
}

pub async fn delete_task(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TASK_SERVICE.delete_task(&req, id.0).await
}

// 配置路由
pub fn configure_task_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/tasks")
            .wrap(middlewares::OptionalJWT)
            .route("", web::get().to(list_tasks))
            .route("", web::post().to(create_task))
            .route("/{id}", web::get().to(get_task))
            .route("/{id}", web::put().to(replace_task))
            .route("/{id}", web::patch().to(patch_task))
            .route("/{id}", web::delete().to(delete_task)),
    );
}
