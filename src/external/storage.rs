use crate::error::AppResult;
use crate::models::StorageObject;
use async_trait::async_trait;
use std::time::Duration;

/// Blob store the course video assets live in.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn list_objects(&self, prefix: Option<String>) -> AppResult<Vec<StorageObject>>;

    async fn presign_get(&self, key: &str, expires_in: Duration) -> AppResult<String>;

    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> AppResult<String>;
}
