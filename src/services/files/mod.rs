pub mod download;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::FieldErrors;
use crate::policy::Caller;
use crate::storage::Storage;

const FILE_NOT_OWNED: &str = "You can only reference files you uploaded.";

pub struct FileService {
    storage: Option<Arc<dyn Storage>>,
}

impl FileService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => super::storage_from_request(request),
        }
    }

    // 上传文件
    pub async fn handle_upload(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        upload::handle_upload(self, request, payload).await
    }

    // 下载文件
    pub async fn handle_download(
        &self,
        request: &HttpRequest,
        file_token: String,
    ) -> ActixResult<HttpResponse> {
        download::handle_download(self, request, file_token).await
    }
}

/// 检查写入中引用的文件 token：必须存在，且非教职人员只能引用自己上传的文件
pub(crate) async fn check_file_reference(
    storage: &dyn Storage,
    caller: &Caller,
    field: &str,
    token: &str,
) -> Result<Option<FieldErrors>> {
    let Some(file) = storage.get_file_by_token(token).await? else {
        return Ok(Some(FieldErrors::invalid_pk(field, token)));
    };
    if caller.is_staff() || caller.is(file.uploader_id) {
        Ok(None)
    } else {
        Ok(Some(FieldErrors::single(field, FILE_NOT_OWNED)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::files::entities::NewStoredFile;
    use crate::models::users::entities::User;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, test_support};

    async fn check(storage: &SeaOrmStorage, user: &User, token: &str) -> Option<FieldErrors> {
        check_file_reference(storage, &Caller::from_user(user), "file", token)
            .await
            .expect("lookup")
    }

    #[tokio::test]
    async fn test_file_reference_rules() {
        let storage = test_support::storage().await;
        let alice = test_support::user(&storage, "alice", false).await;
        let bob = test_support::user(&storage, "bob", false).await;
        let staff = test_support::user(&storage, "carol", true).await;
        storage
            .create_file(NewStoredFile {
                download_token: "alice-file".into(),
                original_name: "report.pdf".into(),
                stored_name: "1-report.bin".into(),
                file_size: 10,
                content_type: "application/pdf".into(),
                uploader_id: alice.id,
            })
            .await
            .expect("create file");

        assert!(check(&storage, &alice, "alice-file").await.is_none());
        assert!(check(&storage, &staff, "alice-file").await.is_none());
        assert!(
            check(&storage, &bob, "alice-file")
                .await
                .is_some_and(|e| e.contains("file"))
        );
        assert!(
            check(&storage, &alice, "missing")
                .await
                .is_some_and(|e| e.contains("file"))
        );
    }
}
