pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::tasks::requests::{TaskListQuery, TaskPayload};
use crate::models::{FieldErrors, WriteMode};
use crate::policy::Caller;
use crate::storage::Storage;

use super::files::check_file_reference;

pub struct TaskService {
    storage: Option<Arc<dyn Storage>>,
}

impl TaskService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_tasks(
        &self,
        request: &HttpRequest,
        query: TaskListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_tasks(self, request, query).await
    }

    pub async fn create_task(
        &self,
        request: &HttpRequest,
        payload: TaskPayload,
    ) -> ActixResult<HttpResponse> {
        create::create_task(self, request, payload).await
    }

    pub async fn get_task(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        get::get_task(self, request, id).await
    }

    pub async fn update_task(
        &self,
        request: &HttpRequest,
        id: i64,
        payload: TaskPayload,
        mode: WriteMode,
    ) -> ActixResult<HttpResponse> {
        update::update_task(self, request, id, payload, mode).await
    }

    pub async fn delete_task(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        delete::delete_task(self, request, id).await
    }
}

/// 引用检查：主题必须存在，附件必须可被调用者引用
async fn check_references(
    storage: &dyn Storage,
    caller: &Caller,
    payload: &TaskPayload,
) -> Result<Option<FieldErrors>> {
    let mut errors = FieldErrors::new();
    if let Some(topic_id) = payload.topic_id
        && storage.get_topic_by_id(topic_id).await?.is_none()
    {
        errors.merge(FieldErrors::invalid_pk("topic", topic_id));
    }
    if let Some(token) = payload.attachment_token()
        && let Some(file_errors) = check_file_reference(storage, caller, "attachment", token).await?
    {
        errors.merge(file_errors);
    }
    Ok((!errors.is_empty()).then_some(errors))
}
