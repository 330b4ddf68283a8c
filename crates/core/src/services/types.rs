//! Wire types exchanged with the collaborating services.

use reqwest::multipart;
use serde::{Deserialize, Serialize};

use super::ServiceError;

/// The document being submitted.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Original file name (the OCR service derives the format from it).
    pub filename: String,
    /// MIME type, if known.
    pub content_type: Option<String>,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Build the multipart `file` part.
    pub(crate) fn to_part(&self) -> Result<multipart::Part, ServiceError> {
        let part = multipart::Part::bytes(self.bytes.clone()).file_name(self.filename.clone());
        match &self.content_type {
            Some(ct) => part
                .mime_str(ct)
                .map_err(|e| ServiceError::InvalidRequest(format!("content type {}: {}", ct, e))),
            None => Ok(part),
        }
    }
}

/// Returned by the storage service; correlation key for the submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub file_id: String,
}

/// Parameters for an OCR extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OcrParams {
    pub language: String,
    pub confidence_threshold: f64,
    pub file_id: String,
}

/// A recognised text fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub text: String,
    /// Recognition confidence, 0-100.
    pub confidence: f64,
    pub page: u32,
    /// `[x, y, width, height]`
    #[serde(rename = "bbox")]
    pub bounding_box: [f64; 4],
}

/// Metadata attached to an OCR result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrMetadata {
    #[serde(default)]
    pub total_text_blocks: u32,
    #[serde(rename = "file_size", default)]
    pub file_size_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_threshold: Option<f64>,
}

/// Result of one OCR extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrResult {
    #[serde(default)]
    pub full_text: String,
    #[serde(default)]
    pub text_blocks: Vec<TextBlock>,
    #[serde(default)]
    pub overall_confidence: f64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(rename = "processing_time", default)]
    pub processing_time_seconds: f64,
    #[serde(default)]
    pub language: String,
    pub metadata: OcrMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// `GET /languages` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageList {
    #[serde(rename = "supported_languages")]
    pub supported: Vec<String>,
    pub default: String,
}

/// Body of `POST /process`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRequest {
    pub file_id: String,
    pub language: String,
}

/// Identifies one asynchronous ETL job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    pub job_id: String,
}

/// Job status as reported by the ETL service.
///
/// Unrecognised values are kept as `Unknown` and are never terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
    Unknown(String),
}

impl JobStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "queued" => JobStatus::Queued,
            // the backend reports "processing" while a job runs
            "running" | "processing" => JobStatus::Running,
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            other => JobStatus::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Unknown(raw) => raw,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        JobStatus::parse(&raw)
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One poll of `GET /jobs/{job_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatusReport {
    #[serde(default = "missing_status")]
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

fn missing_status() -> JobStatus {
    JobStatus::Unknown(String::new())
}

impl JobStatusReport {
    pub fn new(status: JobStatus) -> Self {
        Self {
            status,
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Failed,
            error_message: Some(message.into()),
        }
    }
}

/// Opaque success payload of a completed ETL job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EtlResult(pub serde_json::Value);

impl EtlResult {
    pub fn payload(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Entry of the recent jobs list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub job_id: String,
    pub file_id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JobListResponse {
    #[serde(default)]
    pub jobs: Vec<JobSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_parse() {
        assert_eq!(JobStatus::parse("queued"), JobStatus::Queued);
        assert_eq!(JobStatus::parse("running"), JobStatus::Running);
        assert_eq!(JobStatus::parse("processing"), JobStatus::Running);
        assert_eq!(JobStatus::parse("completed"), JobStatus::Completed);
        assert_eq!(JobStatus::parse("failed"), JobStatus::Failed);
        assert_eq!(
            JobStatus::parse("archived"),
            JobStatus::Unknown("archived".to_string())
        );
        // matching is exact
        assert_eq!(
            JobStatus::parse("COMPLETED"),
            JobStatus::Unknown("COMPLETED".to_string())
        );
    }

    #[test]
    fn test_only_completed_and_failed_are_terminal() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(!JobStatus::Unknown("paused".to_string()).is_terminal());
    }

    #[test]
    fn test_status_report_deserialize() {
        let report: JobStatusReport =
            serde_json::from_str(r#"{"status": "failed", "error_message": "bad format"}"#)
                .unwrap();
        assert_eq!(report.status, JobStatus::Failed);
        assert_eq!(report.error_message.as_deref(), Some("bad format"));
    }

    #[test]
    fn test_status_report_without_status_is_unknown() {
        let report: JobStatusReport =
            serde_json::from_str(r#"{"detail": "Job not found"}"#).unwrap();
        assert_eq!(report.status, JobStatus::Unknown(String::new()));
        assert!(!report.status.is_terminal());
    }

    #[test]
    fn test_ocr_result_from_service_json() {
        let json = r#"{
            "file_id": "f1",
            "processing_time": 1.25,
            "total_pages": 2,
            "language": "eng",
            "overall_confidence": 92.0,
            "text_blocks": [
                {"text": "Hello", "confidence": 95.5, "bbox": [10, 20, 30, 40], "page": 1}
            ],
            "full_text": "--- Page 1 ---\nHello",
            "metadata": {"filename": "scan.png", "file_size": 2048, "confidence_threshold": 30.0, "total_text_blocks": 1},
            "timestamp": "2024-05-01T10:00:00"
        }"#;
        let result: OcrResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.processing_time_seconds, 1.25);
        assert_eq!(result.text_blocks[0].bounding_box, [10.0, 20.0, 30.0, 40.0]);
        assert_eq!(result.metadata.file_size_bytes, 2048);
        assert_eq!(result.metadata.total_text_blocks, 1);
        assert_eq!(result.file_id.as_deref(), Some("f1"));
    }

    #[test]
    fn test_language_list_deserialize() {
        let list: LanguageList =
            serde_json::from_str(r#"{"supported_languages": ["eng", "fra"], "default": "eng"}"#)
                .unwrap();
        assert_eq!(list.supported, vec!["eng", "fra"]);
        assert_eq!(list.default, "eng");
    }

    #[test]
    fn test_upload_file_part_rejects_bad_mime() {
        let file = UploadFile::new("a.png", vec![1, 2, 3]).with_content_type("not a mime");
        assert!(matches!(
            file.to_part(),
            Err(ServiceError::InvalidRequest(_))
        ));
    }
}
