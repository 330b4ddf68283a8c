//! Common test utilities for in-process API testing with mocks.
//!
//! This module provides a test fixture that builds the console router with
//! mock collaborators injected, so endpoints can be exercised without any
//! real storage, OCR or ETL service.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use docflow_core::{
    testing::{MockEtlService, MockFileStorage, MockOcrService},
    Config, PollerConfig,
};
use docflow_server::state::AppState;

/// Re-export fixtures for test convenience
#[allow(unused_imports)]
pub use docflow_core::testing::fixtures;

const BOUNDARY: &str = "docflow-test-boundary";

/// Test fixture with mock collaborators.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_ocr_submission() {
///     let fixture = TestFixture::new();
///     let response = fixture
///         .submit(&[("processing_type", "ocr")], Some(("scan.png", b"...")))
///         .await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Shared state, for inspecting the reporter
    pub state: Arc<AppState>,
    pub storage: Arc<MockFileStorage>,
    pub ocr: Arc<MockOcrService>,
    pub etl: Arc<MockEtlService>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a fixture with fast polling.
    pub fn new() -> Self {
        Self::with_poller(PollerConfig {
            interval_ms: 1,
            ..Default::default()
        })
    }

    pub fn with_poller(poller: PollerConfig) -> Self {
        let storage = Arc::new(MockFileStorage::new());
        let ocr = Arc::new(MockOcrService::new());
        let etl = Arc::new(MockEtlService::new());

        let config = Config {
            poller,
            ..Default::default()
        };

        let state = Arc::new(AppState::new(
            config,
            storage.clone(),
            ocr.clone(),
            etl.clone(),
        ));
        let router = docflow_server::api::create_router(state.clone());

        Self {
            router,
            state,
            storage,
            ocr,
            etl,
        }
    }

    /// Send a GET request to the test router.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// POST a multipart submission with the given text fields and file.
    pub async fn submit(&self, fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/submissions")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(fields, file)))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Encode a multipart/form-data body.
fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
