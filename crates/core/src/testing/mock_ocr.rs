//! Mock OCR service.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{fixtures, lock};
use crate::services::{LanguageList, OcrParams, OcrResult, OcrService, ServiceError, UploadFile};

/// Mock implementation of the OcrService trait.
#[derive(Debug)]
pub struct MockOcrService {
    result: Mutex<OcrResult>,
    extract_failure: Mutex<Option<(u16, String)>>,
    extracts: Mutex<Vec<OcrParams>>,
    languages: Mutex<Option<LanguageList>>,
    unhealthy: Mutex<bool>,
}

impl Default for MockOcrService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockOcrService {
    pub fn new() -> Self {
        Self {
            result: Mutex::new(fixtures::ocr_result(85.0)),
            extract_failure: Mutex::new(None),
            extracts: Mutex::new(Vec::new()),
            languages: Mutex::new(Some(LanguageList {
                supported: vec!["eng".to_string(), "fra".to_string()],
                default: "eng".to_string(),
            })),
            unhealthy: Mutex::new(false),
        }
    }

    /// Result returned by every successful extraction.
    pub fn set_result(&self, result: OcrResult) {
        *lock(&self.result) = result;
    }

    pub fn fail_extract(&self, status: u16, message: impl Into<String>) {
        *lock(&self.extract_failure) = Some((status, message.into()));
    }

    pub fn set_languages(&self, languages: LanguageList) {
        *lock(&self.languages) = Some(languages);
    }

    /// Make the language endpoint unavailable.
    pub fn fail_languages(&self) {
        *lock(&self.languages) = None;
    }

    pub fn set_healthy(&self, healthy: bool) {
        *lock(&self.unhealthy) = !healthy;
    }

    /// Parameters of every extract call, in call order.
    pub fn extract_calls(&self) -> Vec<OcrParams> {
        lock(&self.extracts).clone()
    }
}

#[async_trait]
impl OcrService for MockOcrService {
    fn name(&self) -> &str {
        "mock-ocr"
    }

    async fn extract(
        &self,
        _file: &UploadFile,
        params: &OcrParams,
    ) -> Result<OcrResult, ServiceError> {
        lock(&self.extracts).push(params.clone());

        if let Some((status, message)) = lock(&self.extract_failure).clone() {
            return Err(ServiceError::Http { status, message });
        }
        Ok(lock(&self.result).clone())
    }

    async fn languages(&self) -> Result<LanguageList, ServiceError> {
        lock(&self.languages).clone().ok_or(ServiceError::Http {
            status: 503,
            message: "Language list request failed: 503".to_string(),
        })
    }

    async fn health(&self) -> Result<serde_json::Value, ServiceError> {
        if *lock(&self.unhealthy) {
            return Err(ServiceError::Transport("mock OCR is down".to_string()));
        }
        Ok(serde_json::json!({"status": "healthy"}))
    }
}
