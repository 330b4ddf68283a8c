//! OCR pipeline: upload, then a single extraction call.

use std::sync::Arc;

use tracing::info;

use super::error::PipelineError;
use super::request::SubmissionRequest;
use crate::metrics::time_service_call;
use crate::services::{FileStorage, OcrParams, OcrResult, OcrService};
use crate::status::BusyGuard;

pub struct OcrDriver {
    storage: Arc<dyn FileStorage>,
    ocr: Arc<dyn OcrService>,
}

impl OcrDriver {
    pub fn new(storage: Arc<dyn FileStorage>, ocr: Arc<dyn OcrService>) -> Self {
        Self { storage, ocr }
    }

    /// Upload the file, then extract its text.
    ///
    /// The extraction is only attempted after a successful upload, using the
    /// returned `file_id`.
    pub async fn run(
        &self,
        request: &SubmissionRequest,
        guard: &BusyGuard,
    ) -> Result<OcrResult, PipelineError> {
        let file = request.file();

        guard.update(25, "Uploading file to file organizer...");
        let receipt = time_service_call(self.storage.name(), "upload", self.storage.upload(file))
            .await
            .map_err(PipelineError::upload)?;
        info!(file_id = %receipt.file_id, filename = %file.filename, "File uploaded");

        guard.update(50, "Extracting text using OCR...");
        let params = OcrParams {
            language: request.ocr_language().unwrap_or("eng").to_string(),
            confidence_threshold: request.confidence_threshold().unwrap_or(30.0),
            file_id: receipt.file_id,
        };
        let result = time_service_call(self.ocr.name(), "extract", self.ocr.extract(file, &params))
            .await
            .map_err(PipelineError::ocr)?;

        info!(
            blocks = result.text_blocks.len(),
            confidence = result.overall_confidence,
            "OCR extraction finished"
        );
        guard.update(100, "OCR processing complete!");

        Ok(result)
    }
}
