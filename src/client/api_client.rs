use crate::client::ListingFetcher;
use crate::error::AppResult;
use crate::models::{StorageListResponse, StorageObject};
use async_trait::async_trait;
use reqwest::Client;

/// HTTP client for the public listing routes of a running server.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn storage_list_url(&self) -> String {
        format!("{}/api/s3/list", self.base_url)
    }

    pub async fn list_storage(&self, prefix: &str) -> AppResult<Vec<StorageObject>> {
        let mut request = self.client.get(self.storage_list_url());
        if !prefix.is_empty() {
            request = request.query(&[("prefix", prefix)]);
        }

        let response = request.send().await?.error_for_status()?;
        let listing: StorageListResponse = response.json().await?;
        log::debug!("Fetched {} objects under '{prefix}'", listing.items.len());
        Ok(listing.items)
    }
}

/// Keys are object prefixes; the empty prefix lists the whole bucket.
#[async_trait]
impl ListingFetcher<String, StorageObject> for ApiClient {
    async fn fetch(&self, prefix: &String) -> AppResult<Vec<StorageObject>> {
        self.list_storage(prefix).await
    }
}
