pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::videos::requests::{VideoListQuery, VideoPayload};
use crate::models::{FieldErrors, WriteMode};
use crate::policy::Caller;
use crate::storage::Storage;

use super::files::check_file_reference;

pub struct VideoService {
    storage: Option<Arc<dyn Storage>>,
}

impl VideoService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_videos(
        &self,
        request: &HttpRequest,
        query: VideoListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_videos(self, request, query).await
    }

    pub async fn create_video(
        &self,
        request: &HttpRequest,
        payload: VideoPayload,
    ) -> ActixResult<HttpResponse> {
        create::create_video(self, request, payload).await
    }

    pub async fn get_video(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        get::get_video(self, request, id).await
    }

    pub async fn update_video(
        &self,
        request: &HttpRequest,
        id: i64,
        payload: VideoPayload,
        mode: WriteMode,
    ) -> ActixResult<HttpResponse> {
        update::update_video(self, request, id, payload, mode).await
    }

    pub async fn delete_video(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        delete::delete_video(self, request, id).await
    }
}

/// 引用检查：主题必须存在，视频文件必须可被调用者引用
async fn check_references(
    storage: &dyn Storage,
    caller: &Caller,
    payload: &VideoPayload,
) -> Result<Option<FieldErrors>> {
    let mut errors = FieldErrors::new();
    if let Some(topic_id) = payload.topic_id
        && storage.get_topic_by_id(topic_id).await?.is_none()
    {
        errors.merge(FieldErrors::invalid_pk("topic", topic_id));
    }
    if let Some(token) = payload.video_file.as_deref()
        && let Some(file_errors) = check_file_reference(storage, caller, "video_file", token).await?
    {
        errors.merge(file_errors);
    }
    Ok((!errors.is_empty()).then_some(errors))
}
