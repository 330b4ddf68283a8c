//! Clients for the three collaborating services.
//!
//! Each collaborator sits behind a trait so the pipeline drivers can be
//! exercised against mocks (see [`crate::testing`]). The HTTP
//! implementations speak the path-based protocol:
//!
//! - storage: `POST /upload`, `GET /health`
//! - OCR: `POST /extract`, `GET /languages`, `GET /health`
//! - ETL: `POST /process`, `GET /jobs/{job_id}`, `GET /jobs?per_page=N`, `GET /health`

mod etl;
mod http;
mod ocr;
mod storage;
mod types;

pub use etl::HttpEtlService;
pub use ocr::HttpOcrService;
pub use storage::HttpFileStorage;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised at the collaborator boundary.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Non-success HTTP status. `message` is the body's `detail` field when
    /// present, otherwise synthesized from the status code.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Connection refused, DNS failure, timeout.
    #[error("connection failed: {0}")]
    Transport(String),

    /// Body could not be decoded.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The request could not be built (e.g. malformed content type).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ServiceError {
    /// HTTP status, when the collaborator answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// File storage/organizer service.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Service name for logging.
    fn name(&self) -> &str;

    /// Upload the raw file and obtain its correlation id.
    async fn upload(&self, file: &UploadFile) -> Result<UploadReceipt, ServiceError>;

    /// Query the health endpoint.
    async fn health(&self) -> Result<serde_json::Value, ServiceError>;
}

/// Optical text extraction service.
#[async_trait]
pub trait OcrService: Send + Sync {
    fn name(&self) -> &str;

    /// Extract text from the file (request/response, no polling).
    async fn extract(&self, file: &UploadFile, params: &OcrParams)
        -> Result<OcrResult, ServiceError>;

    /// Languages the OCR engine supports.
    async fn languages(&self) -> Result<LanguageList, ServiceError>;

    async fn health(&self) -> Result<serde_json::Value, ServiceError>;
}

/// Asynchronous extract/transform/load job service.
#[async_trait]
pub trait EtlService: Send + Sync {
    fn name(&self) -> &str;

    /// Submit a processing job for an uploaded file.
    async fn submit(&self, request: &ProcessRequest) -> Result<JobHandle, ServiceError>;

    /// Current status of a job.
    async fn job_status(&self, job_id: &str) -> Result<JobStatusReport, ServiceError>;

    /// Final payload of a completed job.
    async fn job_result(&self, job_id: &str) -> Result<EtlResult, ServiceError>;

    /// Most recent jobs, newest first.
    async fn recent_jobs(&self, per_page: u32) -> Result<Vec<JobSummary>, ServiceError>;

    async fn health(&self) -> Result<serde_json::Value, ServiceError>;
}
