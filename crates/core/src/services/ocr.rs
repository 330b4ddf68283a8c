//! OCR service client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client};
use tracing::debug;

use super::http::{build_client, decode_json, map_send_error, normalize_base_url};
use super::{LanguageList, OcrParams, OcrResult, OcrService, ServiceError, UploadFile};

/// reqwest-backed [`OcrService`].
pub struct HttpOcrService {
    client: Client,
    base_url: String,
}

impl HttpOcrService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: normalize_base_url(base_url),
        })
    }
}

#[async_trait]
impl OcrService for HttpOcrService {
    fn name(&self) -> &str {
        "ocr"
    }

    async fn extract(
        &self,
        file: &UploadFile,
        params: &OcrParams,
    ) -> Result<OcrResult, ServiceError> {
        let url = format!("{}/extract", self.base_url);
        debug!(
            "OCR extract: file_id={}, language={}, threshold={}",
            params.file_id, params.language, params.confidence_threshold
        );

        let form = multipart::Form::new()
            .part("file", file.to_part()?)
            .text("language", params.language.clone())
            .text(
                "confidence_threshold",
                params.confidence_threshold.to_string(),
            )
            .text("file_id", params.file_id.clone());

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(map_send_error)?;

        decode_json(response, "OCR service error").await
    }

    async fn languages(&self) -> Result<LanguageList, ServiceError> {
        let url = format!("{}/languages", self.base_url);
        let response = self.client.get(&url).send().await.map_err(map_send_error)?;
        decode_json(response, "Language list request failed").await
    }

    async fn health(&self) -> Result<serde_json::Value, ServiceError> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await.map_err(map_send_error)?;
        decode_json(response, "Health check failed").await
    }
}
