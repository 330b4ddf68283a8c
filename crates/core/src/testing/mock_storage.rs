//! Mock file storage.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::lock;
use crate::services::{FileStorage, ServiceError, UploadFile, UploadReceipt};

/// Mock implementation of the FileStorage trait.
///
/// Hands out `mock-file-N` ids unless a fixed id is configured.
#[derive(Debug, Default)]
pub struct MockFileStorage {
    file_id: Option<String>,
    uploads: Mutex<Vec<String>>,
    failure: Mutex<Option<(u16, String)>>,
    unhealthy: Mutex<bool>,
    counter: AtomicU32,
}

impl MockFileStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer uploads with `file_id`.
    pub fn with_file_id(file_id: impl Into<String>) -> Self {
        Self {
            file_id: Some(file_id.into()),
            ..Self::default()
        }
    }

    /// Make every upload fail with an HTTP error.
    pub fn fail_uploads(&self, status: u16, message: impl Into<String>) {
        *lock(&self.failure) = Some((status, message.into()));
    }

    pub fn set_healthy(&self, healthy: bool) {
        *lock(&self.unhealthy) = !healthy;
    }

    /// Number of upload calls, failed ones included.
    pub fn upload_calls(&self) -> usize {
        lock(&self.uploads).len()
    }

    /// File names of all uploads, in call order.
    pub fn uploaded(&self) -> Vec<String> {
        lock(&self.uploads).clone()
    }
}

#[async_trait]
impl FileStorage for MockFileStorage {
    fn name(&self) -> &str {
        "mock-storage"
    }

    async fn upload(&self, file: &UploadFile) -> Result<UploadReceipt, ServiceError> {
        lock(&self.uploads).push(file.filename.clone());

        if let Some((status, message)) = lock(&self.failure).clone() {
            return Err(ServiceError::Http { status, message });
        }

        let file_id = match &self.file_id {
            Some(id) => id.clone(),
            None => format!("mock-file-{}", self.counter.fetch_add(1, Ordering::SeqCst) + 1),
        };
        Ok(UploadReceipt { file_id })
    }

    async fn health(&self) -> Result<serde_json::Value, ServiceError> {
        if *lock(&self.unhealthy) {
            return Err(ServiceError::Transport("mock storage is down".to_string()));
        }
        Ok(serde_json::json!({"status": "healthy"}))
    }
}
