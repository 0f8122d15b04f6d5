pub mod root;
pub mod schema;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::policy::{AccessPolicy, Action, Caller, Resource};
use crate::services::deny_response;

pub struct ApiDocsService;

impl ApiDocsService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn get_root(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let caller = Caller::from_request(request);
        if let Err(reason) =
            AccessPolicy::authorize(&caller, &Resource::ApiSchema, Action::Read).into_result()
        {
            return Ok(deny_response(reason));
        }
        root::get_root(request).await
    }

    pub async fn get_schema(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let caller = Caller::from_request(request);
        if let Err(reason) =
            AccessPolicy::authorize(&caller, &Resource::ApiSchema, Action::Read).into_result()
        {
            return Ok(deny_response(reason));
        }
        schema::get_schema().await
    }
}
