//! 提交服务
//!
//! 所有实例查询都先按调用者的可见范围过滤：非教职人员看不到他人的提交，
//! 对他人提交的访问与访问不存在的提交一样返回 404。
//! 写入字段由访问策略给出的字段掩码裁剪。

pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::submissions::requests::{
    SubmissionListQuery, SubmissionPayload, SubmissionWrite,
};
use crate::models::{FieldErrors, WriteMode};
use crate::policy::Caller;
use crate::storage::Storage;

use super::files::check_file_reference;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        query: SubmissionListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_submissions(self, request, query).await
    }

    pub async fn create_submission(
        &self,
        request: &HttpRequest,
        payload: SubmissionPayload,
    ) -> ActixResult<HttpResponse> {
        create::create_submission(self, request, payload).await
    }

    pub async fn get_submission(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_submission(self, request, id).await
    }

    pub async fn update_submission(
        &self,
        request: &HttpRequest,
        id: i64,
        payload: SubmissionPayload,
        mode: WriteMode,
    ) -> ActixResult<HttpResponse> {
        update::update_submission(self, request, id, payload, mode).await
    }

    pub async fn delete_submission(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_submission(self, request, id).await
    }
}

/// 对裁剪后的写入集合做引用检查
async fn check_references(
    storage: &dyn Storage,
    caller: &Caller,
    write: &SubmissionWrite,
) -> Result<Option<FieldErrors>> {
    let mut errors = FieldErrors::new();
    if let Some(task_id) = write.task_id
        && storage.get_task_by_id(task_id).await?.is_none()
    {
        errors.merge(FieldErrors::invalid_pk("task", task_id));
    }
    if let Some(token) = write.file.as_deref()
        && let Some(file_errors) = check_file_reference(storage, caller, "file", token).await?
    {
        errors.merge(file_errors);
    }
    Ok((!errors.is_empty()).then_some(errors))
}
