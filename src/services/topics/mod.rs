pub mod contents;
pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::WriteMode;
use crate::models::topics::requests::{TopicListQuery, TopicPayload};
use crate::storage::Storage;

pub struct TopicService {
    storage: Option<Arc<dyn Storage>>,
}

impl TopicService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_topics(
        &self,
        request: &HttpRequest,
        query: TopicListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_topics(self, request, query).await
    }

    pub async fn create_topic(
        &self,
        request: &HttpRequest,
        payload: TopicPayload,
    ) -> ActixResult<HttpResponse> {
        create::create_topic(self, request, payload).await
    }

    pub async fn get_topic(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        detail::get_topic(self, request, id).await
    }

    pub async fn update_topic(
        &self,
        request: &HttpRequest,
        id: i64,
        payload: TopicPayload,
        mode: WriteMode,
    ) -> ActixResult<HttpResponse> {
        update::update_topic(self, request, id, payload, mode).await
    }

    pub async fn delete_topic(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        delete::delete_topic(self, request, id).await
    }

    // 主题下的视频
    pub async fn get_topic_videos(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        contents::get_topic_videos(self, request, id).await
    }

    // 主题下的任务
    pub async fn get_topic_tasks(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        contents::get_topic_tasks(self, request, id).await
    }
}
