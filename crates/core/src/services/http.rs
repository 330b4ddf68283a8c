//! Shared reqwest plumbing for the collaborator clients.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::ServiceError;

/// Build a client with the configured per-request timeout.
pub(crate) fn build_client(timeout: Duration) -> Result<Client, ServiceError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ServiceError::Transport(format!("failed to create HTTP client: {}", e)))
}

/// Normalize a configured base URL (no trailing slash).
pub(crate) fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Map a reqwest send error onto the service taxonomy.
pub(crate) fn map_send_error(e: reqwest::Error) -> ServiceError {
    if e.is_timeout() {
        ServiceError::Transport(format!("request timed out: {}", e))
    } else if e.is_decode() {
        ServiceError::Parse(e.to_string())
    } else {
        ServiceError::Transport(e.to_string())
    }
}

/// Turn a non-success response into `ServiceError::Http`.
///
/// The `detail` field of a JSON body is used verbatim; otherwise the message
/// is `"{fallback}: {status}"`.
pub(crate) async fn error_from_response(response: Response, fallback: &str) -> ServiceError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = extract_detail(&body).unwrap_or_else(|| format!("{}: {}", fallback, status));
    ServiceError::Http { status, message }
}

/// Pull the `detail` field out of an error body.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        // Validation errors carry a structured detail
        other => Some(other.to_string()),
    }
}

/// Check the status and decode a JSON body.
pub(crate) async fn decode_json<T: DeserializeOwned>(
    response: Response,
    fallback: &str,
) -> Result<T, ServiceError> {
    if !response.status().is_success() {
        return Err(error_from_response(response, fallback).await);
    }

    let body = response.text().await.map_err(map_send_error)?;
    serde_json::from_str(&body).map_err(|e| ServiceError::Parse(e.to_string()))
}
