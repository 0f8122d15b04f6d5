pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::{ObjectCache, user_cache_key};
use crate::models::users::requests::{UpdateUserPrivilegesRequest, UserListQuery};
use crate::storage::Storage;

pub struct UserService {
    storage: Option<Arc<dyn Storage>>,
}

impl UserService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => super::storage_from_request(request),
        }
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
        super::cache_from_request(request)
    }

    /// 账户变更后使认证缓存失效
    pub(crate) async fn invalidate_user(&self, request: &HttpRequest, user_id: i64) {
        if let Some(cache) = self.get_cache(request) {
            cache.remove(&user_cache_key(user_id)).await;
        }
    }

    pub async fn list_users(
        &self,
        request: &HttpRequest,
        query: UserListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, request, query).await
    }

    pub async fn get_user(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        get::get_user(self, request, id).await
    }

    pub async fn update_privileges(
        &self,
        request: &HttpRequest,
        id: i64,
        update: UpdateUserPrivilegesRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_privileges(self, request, id, update).await
    }
}
