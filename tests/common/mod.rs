#![allow(dead_code)]

use std::sync::Arc;

use rust_course_hub::cache::ObjectCache;
use rust_course_hub::cache::object_cache::moka::MokaCacheWrapper;
use rust_course_hub::models::users::entities::User;
use rust_course_hub::models::users::requests::CreateUserRequest;
use rust_course_hub::storage::Storage;
use rust_course_hub::storage::sea_orm_storage::SeaOrmStorage;

pub struct TestContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

impl TestContext {
    pub async fn new() -> Self {
        let storage = SeaOrmStorage::in_memory()
            .await
            .expect("in-memory storage should start");
        Self {
            storage: Arc::new(storage),
            cache: Arc::new(MokaCacheWrapper::with_settings(1_000, 300)),
        }
    }

    pub async fn user(&self, name: &str, is_staff: bool) -> User {
        self.storage
            .create_user(CreateUserRequest {
                email: format!("{name}@example.com"),
                username: name.to_string(),
                password_hash: "hash".to_string(),
                is_staff,
                is_superuser: false,
            })
            .await
            .expect("create user")
    }
}

pub fn bearer(user: &User) -> (&'static str, String) {
    let pair = user.generate_token_pair(None).expect("token pair");
    ("Authorization", format!("Bearer {}", pair.access_token))
}

/// 构建与 main 相同路由的测试应用
#[macro_export]
macro_rules! test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($ctx.storage.clone()))
                .app_data(actix_web::web::Data::new($ctx.cache.clone()))
                .app_data(
                    actix_web::web::JsonConfig::default()
                        .error_handler(rust_course_hub::utils::json_error_handler),
                )
                .configure(rust_course_hub::routes::configure_api_routes),
        )
        .await
    };
}
