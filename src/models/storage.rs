use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StorageObject {
    pub key: String,
    pub size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StorageListResponse {
    pub items: Vec<StorageObject>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StorageListQuery {
    pub prefix: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PresignQuery {
    pub key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PresignResponse {
    pub key: String,
    pub url: String,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequest {
    #[serde(default)]
    #[schema(example = "video/mp4")]
    pub content_type: Option<String>,
    #[serde(default)]
    #[schema(example = "Lesson 1.mp4")]
    pub file_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    pub url: String,
    pub key: String,
    pub public_url: String,
}
