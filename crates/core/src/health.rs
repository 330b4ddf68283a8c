//! Startup health probe of the collaborating services.
//!
//! Advisory only: results are logged and nothing waits on them.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::services::{EtlService, FileStorage, OcrService, ServiceError};

/// Result of probing one service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub service: String,
    pub available: bool,
    /// Body of the health endpoint, when it answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub checked_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct HealthProber {
    storage: Arc<dyn FileStorage>,
    ocr: Arc<dyn OcrService>,
    etl: Arc<dyn EtlService>,
    timeout: Duration,
}

impl HealthProber {
    pub fn new(
        storage: Arc<dyn FileStorage>,
        ocr: Arc<dyn OcrService>,
        etl: Arc<dyn EtlService>,
        timeout: Duration,
    ) -> Self {
        Self {
            storage,
            ocr,
            etl,
            timeout,
        }
    }

    /// Probe all three services concurrently.
    pub async fn probe_all(&self) -> Vec<ServiceHealth> {
        let (storage, ocr, etl) = futures::join!(
            probe(self.storage.name(), self.timeout, self.storage.health()),
            probe(self.ocr.name(), self.timeout, self.ocr.health()),
            probe(self.etl.name(), self.timeout, self.etl.health()),
        );
        vec![storage, ocr, etl]
    }

    /// Probe in the background and log the results.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let results = self.probe_all().await;
            let available = results.iter().filter(|r| r.available).count();
            info!(
                available,
                total = results.len(),
                "Service health probe finished"
            );
        })
    }
}

async fn probe<F>(service: &str, timeout: Duration, call: F) -> ServiceHealth
where
    F: Future<Output = Result<serde_json::Value, ServiceError>>,
{
    let outcome = match tokio::time::timeout(timeout, call).await {
        Ok(Ok(body)) => Ok(body),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!("no response within {}s", timeout.as_secs())),
    };

    match outcome {
        Ok(body) => {
            info!(service, "Service available");
            ServiceHealth {
                service: service.to_string(),
                available: true,
                detail: Some(body),
                error: None,
                checked_at: Utc::now(),
            }
        }
        Err(error) => {
            warn!(service, error = %error, "Service unavailable");
            ServiceHealth {
                service: service.to_string(),
                available: false,
                detail: None,
                error: Some(error),
                checked_at: Utc::now(),
            }
        }
    }
}
