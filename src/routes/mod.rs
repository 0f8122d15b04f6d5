pub mod api_docs;

pub mod auth;

pub mod users;

pub mod topics;

pub mod videos;

pub mod tasks;

pub mod submissions;

pub mod files;

pub use api_docs::configure_api_docs_routes;
pub use auth::configure_auth_routes;
pub use files::configure_file_routes;
pub use submissions::configure_submission_routes;
pub use tasks::configure_task_routes;
pub use topics::configure_topic_routes;
pub use users::configure_user_routes;
pub use videos::configure_video_routes;

use actix_web::web;

/// 注册全部 API 路由
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_user_routes)
        .configure(configure_topic_routes)
        .configure(configure_video_routes)
        .configure(configure_task_routes)
        .configure(configure_submission_routes)
        .configure(configure_file_routes)
        .configure(configure_api_docs_routes);
}
