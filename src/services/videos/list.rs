use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::VideoService;
use crate::models::ApiResponse;
use crate::models::videos::requests::VideoListQuery;
use crate::policy::{AccessPolicy, Action, Caller, Resource};
use crate::services::{deny_response, error_response};

pub async fn list_videos(
    service: &VideoService,
    request: &HttpRequest,
    query: VideoListQuery,
) -> ActixResult<HttpResponse> {
    let caller = Caller::from_request(request);
    if let Err(reason) = AccessPolicy::authorize(&caller, &Resource::Video, Action::List).into_result()
    {
        return Ok(deny_response(reason));
    }

    let storage = service.get_storage(request);
    match storage.list_videos_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Videos retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}
