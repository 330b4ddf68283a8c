//! File storage/organizer client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client};
use tracing::debug;

use super::http::{build_client, decode_json, map_send_error, normalize_base_url};
use super::{FileStorage, ServiceError, UploadFile, UploadReceipt};

/// reqwest-backed [`FileStorage`].
pub struct HttpFileStorage {
    client: Client,
    base_url: String,
}

impl HttpFileStorage {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: normalize_base_url(base_url),
        })
    }
}

#[async_trait]
impl FileStorage for HttpFileStorage {
    fn name(&self) -> &str {
        "storage"
    }

    async fn upload(&self, file: &UploadFile) -> Result<UploadReceipt, ServiceError> {
        let url = format!("{}/upload", self.base_url);
        debug!(
            "Uploading '{}' ({} bytes) to {}",
            file.filename,
            file.size_bytes(),
            url
        );

        let form = multipart::Form::new().part("file", file.to_part()?);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(map_send_error)?;

        decode_json(response, "File upload failed").await
    }

    async fn health(&self) -> Result<serde_json::Value, ServiceError> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await.map_err(map_send_error)?;
        decode_json(response, "Health check failed").await
    }
}
