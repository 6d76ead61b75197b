use crate::config::StorageConfig;
use crate::error::{AppError, AppResult};
use crate::external::ObjectStorage;
use crate::models::*;
use crate::utils::upload_object_key;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct StorageService {
    storage: Arc<dyn ObjectStorage>,
    public_base_url: String,
    playback_expires_in: Duration,
    upload_expires_in: Duration,
}

impl StorageService {
    pub fn new(storage: Arc<dyn ObjectStorage>, config: &StorageConfig) -> Self {
        Self {
            storage,
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
            playback_expires_in: Duration::from_secs(config.playback_url_expires_in),
            upload_expires_in: Duration::from_secs(config.upload_url_expires_in),
        }
    }

    pub async fn list(&self, prefix: Option<String>) -> AppResult<StorageListResponse> {
        let prefix = prefix.filter(|p| !p.is_empty());
        let items = self.storage.list_objects(prefix).await?;
        Ok(StorageListResponse { items })
    }

    /// Short-lived read URL for video playback.
    pub async fn presign_playback(&self, key: Option<String>) -> AppResult<PresignResponse> {
        let key = key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AppError::ValidationError("Missing key".to_string()))?;

        let url = self
            .storage
            .presign_get(&key, self.playback_expires_in)
            .await?;
        Ok(PresignResponse { key, url })
    }

    pub async fn create_upload_url(&self, request: UploadUrlRequest) -> AppResult<UploadUrlResponse> {
        let (Some(content_type), Some(file_name)) = (
            request.content_type.filter(|c| !c.trim().is_empty()),
            request.file_name.filter(|f| !f.trim().is_empty()),
        ) else {
            return Err(AppError::ValidationError(
                "contentType and fileName are required".to_string(),
            ));
        };

        let key = upload_object_key(&file_name);
        let url = self
            .storage
            .presign_put(&key, &content_type, self.upload_expires_in)
            .await?;
        let public_url = format!("{}/{}", self.public_base_url, key);

        log::info!("Issued upload URL for {key}");
        Ok(UploadUrlResponse {
            url,
            key,
            public_url,
        })
    }
}
