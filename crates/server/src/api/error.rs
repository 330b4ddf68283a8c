//! Error responses.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use docflow_core::{PipelineError, SubmissionError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Error returned by API handlers: status code plus `{ "error": ... }`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        let status = match &err {
            SubmissionError::Validation(_) => StatusCode::BAD_REQUEST,
            SubmissionError::Busy => StatusCode::CONFLICT,
            SubmissionError::Pipeline(PipelineError::Timeout { .. }) => {
                StatusCode::GATEWAY_TIMEOUT
            }
            SubmissionError::Pipeline(PipelineError::Cancelled) => StatusCode::CONFLICT,
            SubmissionError::Pipeline(_) => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(ErrorResponse::new(self.message))).into_response()
    }
}
