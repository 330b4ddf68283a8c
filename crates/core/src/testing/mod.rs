//! Mock collaborators for tests.
//!
//! Each mock implements one service trait with scripted responses and call
//! recording, so the pipeline can be exercised without real services.
//!
//! # Example
//!
//! ```rust,ignore
//! use docflow_core::testing::{MockEtlService, ScriptedStatus};
//!
//! let etl = MockEtlService::new();
//! etl.script_statuses(vec![ScriptedStatus::Error, ScriptedStatus::completed()]);
//! etl.set_result(serde_json::json!({"title": "Invoice"}));
//! ```

mod mock_etl;
mod mock_ocr;
mod mock_storage;

pub use mock_etl::{MockEtlService, ScriptedStatus};
pub use mock_ocr::MockOcrService;
pub use mock_storage::MockFileStorage;

use std::sync::{Mutex, MutexGuard};

/// Lock a mock's state, ignoring poisoning from a panicked test.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Test fixtures.
pub mod fixtures {
    use crate::services::{JobStatus, JobSummary, OcrMetadata, OcrResult, TextBlock};

    /// An English, single page OCR result with two text blocks.
    pub fn ocr_result(overall_confidence: f64) -> OcrResult {
        OcrResult {
            full_text: "Invoice 2024-117\nTotal due: 420.00".to_string(),
            text_blocks: vec![
                TextBlock {
                    text: "Invoice 2024-117".to_string(),
                    confidence: 96.5,
                    page: 1,
                    bounding_box: [12.0, 20.0, 240.0, 32.0],
                },
                TextBlock {
                    text: "Total due: 420.00".to_string(),
                    confidence: 48.0,
                    page: 1,
                    bounding_box: [12.0, 410.0, 180.0, 28.0],
                },
            ],
            overall_confidence,
            total_pages: 1,
            processing_time_seconds: 1.42,
            language: "eng".to_string(),
            metadata: OcrMetadata {
                total_text_blocks: 2,
                file_size_bytes: 2048,
                filename: Some("invoice.png".to_string()),
                confidence_threshold: Some(30.0),
            },
            file_id: Some("f1".to_string()),
            timestamp: None,
        }
    }

    /// A recent-jobs entry.
    pub fn job_summary(job_id: &str, status: JobStatus) -> JobSummary {
        JobSummary {
            job_id: job_id.to_string(),
            file_id: format!("file-{}", job_id),
            status,
            language: Some("eng".to_string()),
            created_at: Some("2024-05-01T10:00:00Z".to_string()),
            error_message: None,
        }
    }
}
