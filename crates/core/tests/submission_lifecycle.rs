//! Submission lifecycle integration tests.
//!
//! These tests drive the router end to end against mock collaborators:
//! - OCR upload/extract and rendering
//! - ETL upload/submit/poll and terminal states
//! - Validation without network calls
//! - Reporter always back to idle

use std::sync::Arc;

use docflow_core::{
    pipeline::{EtlDefaults, JobPoller, OcrDefaults, PollerConfig},
    render::{ConfidenceBand, TabContent},
    services::{JobStatus, UploadFile},
    status::OutcomeKind,
    testing::{fixtures, MockEtlService, MockFileStorage, MockOcrService, ScriptedStatus},
    EtlDriver, OcrDriver, PipelineError, StatusReporter, SubmissionError, SubmissionForm,
    SubmissionRouter, ValidationError,
};

/// Test helper wiring a router to mocks.
struct TestHarness {
    router: SubmissionRouter,
    storage: Arc<MockFileStorage>,
    ocr: Arc<MockOcrService>,
    etl: Arc<MockEtlService>,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_storage(MockFileStorage::new())
    }

    fn with_storage(storage: MockFileStorage) -> Self {
        let storage = Arc::new(storage);
        let ocr = Arc::new(MockOcrService::new());
        let etl = Arc::new(MockEtlService::new());

        // Fast polling for tests
        let poller = JobPoller::new(
            etl.clone(),
            PollerConfig {
                interval_ms: 1,
                ..Default::default()
            },
        );

        let router = SubmissionRouter::new(
            StatusReporter::new(),
            OcrDriver::new(storage.clone(), ocr.clone()),
            EtlDriver::new(storage.clone(), etl.clone(), poller, EtlDefaults::default()),
            OcrDefaults::default(),
        );

        Self {
            router,
            storage,
            ocr,
            etl,
        }
    }

    fn assert_idle(&self) {
        let state = self.router.reporter().snapshot();
        assert!(!state.busy, "reporter should not be busy");
        assert_eq!(state.progress_percent, 0);
        assert_eq!(state.status_text, "Ready");
    }

    fn total_calls(&self) -> usize {
        self.storage.upload_calls()
            + self.ocr.extract_calls().len()
            + self.etl.submit_calls()
            + self.etl.status_calls() as usize
    }
}

fn image() -> UploadFile {
    UploadFile::new("invoice.png", vec![0x89, 0x50, 0x4e, 0x47]).with_content_type("image/png")
}

fn pdf() -> UploadFile {
    UploadFile::new("contract.pdf", b"%PDF-1.7 ...".to_vec()).with_content_type("application/pdf")
}

#[tokio::test]
async fn test_ocr_end_to_end_renders_confidence() {
    let harness = TestHarness::with_storage(MockFileStorage::with_file_id("f1"));
    harness.ocr.set_result(fixtures::ocr_result(92.0));

    let payload = harness
        .router
        .route(SubmissionForm::new(image(), "ocr"))
        .await
        .expect("OCR submission should succeed");

    assert_eq!(harness.ocr.extract_calls()[0].file_id, "f1");

    let summary = payload.tab("summary").expect("summary tab");
    match &summary.content {
        TabContent::Summary { items } => {
            let confidence = items
                .iter()
                .find(|i| i.label == "Overall confidence")
                .unwrap();
            assert_eq!(confidence.value, "92%");
            assert_eq!(
                confidence.color.as_deref(),
                Some(ConfidenceBand::Strong.color())
            );
        }
        other => panic!("unexpected summary content: {:?}", other),
    }

    harness.assert_idle();
}

#[tokio::test]
async fn test_upload_413_without_body() {
    let harness = TestHarness::new();
    harness.storage.fail_uploads(413, "File upload failed: 413");

    let err = harness
        .router
        .route(SubmissionForm::new(image(), "ocr"))
        .await
        .unwrap_err();

    match &err {
        SubmissionError::Pipeline(PipelineError::UploadFailed { status, message }) => {
            assert_eq!(*status, Some(413));
            assert!(message.contains("413"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(harness.ocr.extract_calls().is_empty());

    harness.assert_idle();
    let outcome = harness.router.reporter().snapshot().last_outcome.unwrap();
    assert_eq!(outcome.kind, OutcomeKind::Failure);
    assert_eq!(outcome.message, "File upload failed: 413");
}

#[tokio::test]
async fn test_etl_job_failure_surfaces_backend_message() {
    let harness = TestHarness::new();
    harness.etl.set_job_id("j9");
    harness
        .etl
        .script_statuses(vec![ScriptedStatus::failed("bad format")]);

    let err = harness
        .router
        .route(SubmissionForm::new(pdf(), "extract-other"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        SubmissionError::Pipeline(PipelineError::JobFailed {
            message: "bad format".to_string()
        })
    );
    assert_eq!(harness.etl.status_calls(), 1);
    assert_eq!(harness.etl.result_calls(), 0);

    harness.assert_idle();
    let outcome = harness.router.reporter().snapshot().last_outcome.unwrap();
    assert_eq!(outcome.message, "bad format");
}

#[tokio::test]
async fn test_etl_end_to_end_with_transient_errors() {
    let harness = TestHarness::new();
    harness.etl.script_statuses(vec![
        ScriptedStatus::Error,
        ScriptedStatus::status(JobStatus::Queued),
        ScriptedStatus::Error,
        ScriptedStatus::completed(),
    ]);
    harness
        .etl
        .set_result(serde_json::json!({"title": "Contract", "pages": 4}));

    let payload = harness
        .router
        .route(SubmissionForm::new(pdf(), "translate").with_languages("fra", "eng"))
        .await
        .expect("ETL submission should succeed");

    assert_eq!(harness.etl.status_calls(), 4);
    assert_eq!(harness.etl.result_calls(), 1);
    assert_eq!(harness.etl.submitted()[0].language, "fra");
    assert!(payload.tab("fields").is_some());

    harness.assert_idle();
}

#[tokio::test]
async fn test_translate_without_languages_makes_no_calls() {
    let harness = TestHarness::new();

    for form in [
        SubmissionForm::new(pdf(), "translate"),
        SubmissionForm::new(pdf(), "translate").with_languages("", "eng"),
        SubmissionForm::new(pdf(), "translate").with_languages("eng", ""),
    ] {
        let err = harness.router.route(form).await.unwrap_err();
        assert_eq!(
            err,
            SubmissionError::Validation(ValidationError::MissingTranslationLanguages)
        );
    }

    assert_eq!(harness.total_calls(), 0);
    harness.assert_idle();
}

#[tokio::test]
async fn test_missing_fields_make_no_calls() {
    let harness = TestHarness::new();

    let err = harness
        .router
        .route(SubmissionForm {
            processing_type: Some("ocr".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err, SubmissionError::Validation(ValidationError::MissingFile));

    let err = harness
        .router
        .route(SubmissionForm {
            file: Some(image()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        SubmissionError::Validation(ValidationError::MissingProcessingType)
    );

    assert_eq!(harness.total_calls(), 0);
}

#[tokio::test]
async fn test_timeout_then_next_submission_accepted() {
    let harness = TestHarness::new();
    harness.etl.set_default_status(JobStatus::Running);

    let err = harness
        .router
        .route(SubmissionForm::new(pdf(), "extract-other"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        SubmissionError::Pipeline(PipelineError::Timeout { attempts: 15 })
    );
    assert_eq!(harness.etl.status_calls(), 15);
    harness.assert_idle();

    // The system accepts a new submission after any outcome
    harness.etl.set_default_status(JobStatus::Completed);
    harness
        .router
        .route(SubmissionForm::new(pdf(), "extract-other"))
        .await
        .expect("second submission should succeed");
    harness.assert_idle();
}

#[tokio::test]
async fn test_progress_is_published() {
    let harness = TestHarness::new();
    let mut rx = harness.router.reporter().subscribe();

    let collector = tokio::spawn(async move {
        let mut seen = Vec::new();
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            let done = !state.busy && state.last_outcome.is_some();
            seen.push(state);
            if done {
                break;
            }
        }
        seen
    });

    harness
        .router
        .route(SubmissionForm::new(image(), "ocr"))
        .await
        .unwrap();

    // Intermediate states may be coalesced; the final one never is
    let seen = collector.await.unwrap();
    let last = seen.last().unwrap();
    assert!(!last.busy);
    assert_eq!(last.last_outcome.as_ref().unwrap().kind, OutcomeKind::Success);
}
