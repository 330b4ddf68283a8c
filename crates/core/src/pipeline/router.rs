//! Entry point for a submission.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use super::cancel::{CancelHandle, CancelToken};
use super::config::OcrDefaults;
use super::error::{PipelineError, SubmissionError};
use super::etl::EtlDriver;
use super::ocr::OcrDriver;
use super::request::{ProcessingType, SubmissionForm, SubmissionRequest};
use crate::metrics;
use crate::render::{render, DisplayPayload, ProcessingResult};
use crate::status::{BusyGuard, OutcomeKind, StatusReporter};

/// Validates a form, takes the status reporter and dispatches to the
/// matching pipeline driver.
pub struct SubmissionRouter {
    reporter: StatusReporter,
    ocr: OcrDriver,
    etl: EtlDriver,
    ocr_defaults: OcrDefaults,
    in_flight: Mutex<Option<CancelHandle>>,
}

impl SubmissionRouter {
    pub fn new(
        reporter: StatusReporter,
        ocr: OcrDriver,
        etl: EtlDriver,
        ocr_defaults: OcrDefaults,
    ) -> Self {
        Self {
            reporter,
            ocr,
            etl,
            ocr_defaults,
            in_flight: Mutex::new(None),
        }
    }

    pub fn reporter(&self) -> &StatusReporter {
        &self.reporter
    }

    /// Run one submission to a terminal state and render its result.
    ///
    /// Validation happens before any network call. While a submission is in
    /// flight, further calls fail with [`SubmissionError::Busy`]. The
    /// reporter is back to idle when this returns, whatever the outcome.
    pub async fn route(&self, form: SubmissionForm) -> Result<DisplayPayload, SubmissionError> {
        let request = match SubmissionRequest::from_form(form, &self.ocr_defaults) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Submission rejected");
                metrics::SUBMISSIONS_TOTAL
                    .with_label_values(&["none", "rejected"])
                    .inc();
                return Err(e.into());
            }
        };

        let mut guard = self
            .reporter
            .begin("Uploading file...")
            .map_err(|_| SubmissionError::Busy)?;
        guard.update(20, "Uploading file...");

        let (handle, token) = CancelHandle::pair();
        let in_flight = InFlight::register(&self.in_flight, handle);

        let pipeline = request.processing_type().pipeline();
        let span = info_span!(
            "submission",
            id = %Uuid::new_v4(),
            pipeline,
            processing_type = %request.processing_type()
        );

        let start = Instant::now();
        let result = self
            .dispatch(&request, &guard, &token)
            .instrument(span.clone())
            .await;
        drop(in_flight);

        metrics::PIPELINE_DURATION
            .with_label_values(&[pipeline])
            .observe(start.elapsed().as_secs_f64());

        let _entered = span.enter();
        match result {
            Ok(result) => {
                let payload = render(&result);
                info!(
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Submission completed"
                );
                metrics::SUBMISSIONS_TOTAL
                    .with_label_values(&[pipeline, "success"])
                    .inc();
                guard.finish(OutcomeKind::Success, success_message(request.processing_type()));
                Ok(payload)
            }
            Err(e) => {
                let kind = outcome_kind(&e);
                warn!(error = %e, outcome = ?kind, "Submission failed");
                metrics::SUBMISSIONS_TOTAL
                    .with_label_values(&[pipeline, outcome_label(kind)])
                    .inc();
                guard.finish(kind, e.to_string());
                Err(e.into())
            }
        }
    }

    async fn dispatch(
        &self,
        request: &SubmissionRequest,
        guard: &BusyGuard,
        cancel: &CancelToken,
    ) -> Result<ProcessingResult, PipelineError> {
        match request.processing_type() {
            ProcessingType::Ocr => self.ocr.run(request, guard).await.map(ProcessingResult::Ocr),
            ProcessingType::Translate | ProcessingType::ExtractOther => self
                .etl
                .run(request, guard, cancel)
                .await
                .map(ProcessingResult::Etl),
        }
    }

    /// Cancel the in-flight submission. Returns `false` if there is none.
    ///
    /// Only the ETL poll loop observes cancellation; an OCR request runs to
    /// completion.
    pub fn cancel(&self) -> bool {
        match lock_slot(&self.in_flight).as_ref() {
            Some(handle) => {
                info!("Cancellation requested");
                handle.cancel();
                true
            }
            None => false,
        }
    }
}

fn lock_slot(slot: &Mutex<Option<CancelHandle>>) -> MutexGuard<'_, Option<CancelHandle>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the cancel handle of the running submission.
///
/// Clears the slot when dropped, including when the `route` future itself
/// is dropped mid-flight.
struct InFlight<'a> {
    slot: &'a Mutex<Option<CancelHandle>>,
}

impl<'a> InFlight<'a> {
    fn register(slot: &'a Mutex<Option<CancelHandle>>, handle: CancelHandle) -> Self {
        *lock_slot(slot) = Some(handle);
        Self { slot }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        lock_slot(self.slot).take();
    }
}

fn success_message(processing_type: ProcessingType) -> &'static str {
    match processing_type {
        ProcessingType::Ocr => "OCR processing complete!",
        ProcessingType::Translate | ProcessingType::ExtractOther => "ETL processing complete.",
    }
}

fn outcome_kind(err: &PipelineError) -> OutcomeKind {
    match err {
        PipelineError::Timeout { .. } => OutcomeKind::Timeout,
        PipelineError::Cancelled => OutcomeKind::Cancelled,
        _ => OutcomeKind::Failure,
    }
}

fn outcome_label(kind: OutcomeKind) -> &'static str {
    match kind {
        OutcomeKind::Success => "success",
        OutcomeKind::Failure => "failure",
        OutcomeKind::Timeout => "timeout",
        OutcomeKind::Cancelled => "cancelled",
    }
}
