//! Error taxonomy for submissions.

use thiserror::Error;

use crate::services::ServiceError;

/// Local form validation failures. Never reach the network.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please select a file to process.")]
    MissingFile,

    #[error("Please select a processing type.")]
    MissingProcessingType,

    #[error("Unknown processing type: {0}")]
    UnknownProcessingType(String),

    #[error("Please select both source and target languages.")]
    MissingTranslationLanguages,

    #[error("Confidence threshold must be a number between 0 and 100, got '{0}'")]
    InvalidConfidenceThreshold(String),
}

/// Failures of a running pipeline.
///
/// Service-derived variants display the user-facing message verbatim.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("{message}")]
    UploadFailed { status: Option<u16>, message: String },

    #[error("{message}")]
    SubmitFailed { status: Option<u16>, message: String },

    #[error("{message}")]
    OcrServiceError { status: Option<u16>, message: String },

    /// The ETL backend reported the job as failed.
    #[error("{message}")]
    JobFailed { message: String },

    /// The attempt budget ran out before a terminal status.
    #[error("Timed out waiting for results after {attempts} attempts.")]
    Timeout { attempts: u32 },

    #[error("Submission cancelled.")]
    Cancelled,

    /// The job completed but its results could not be loaded.
    #[error("{message}")]
    ResultFetchFailed { message: String },
}

impl PipelineError {
    pub fn upload(err: ServiceError) -> Self {
        PipelineError::UploadFailed {
            status: err.status(),
            message: err.to_string(),
        }
    }

    pub fn submit(err: ServiceError) -> Self {
        PipelineError::SubmitFailed {
            status: err.status(),
            message: err.to_string(),
        }
    }

    pub fn ocr(err: ServiceError) -> Self {
        PipelineError::OcrServiceError {
            status: err.status(),
            message: err.to_string(),
        }
    }

    /// HTTP status reported by the collaborator, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            PipelineError::UploadFailed { status, .. }
            | PipelineError::SubmitFailed { status, .. }
            | PipelineError::OcrServiceError { status, .. } => *status,
            _ => None,
        }
    }
}

/// Everything [`crate::pipeline::SubmissionRouter::route`] can return.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("A submission is already in progress.")]
    Busy,

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}
