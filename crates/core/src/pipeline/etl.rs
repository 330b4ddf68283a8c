//! ETL pipeline: upload, submit, then poll until a terminal state.

use std::sync::Arc;

use tracing::info;

use super::cancel::CancelToken;
use super::config::EtlDefaults;
use super::error::PipelineError;
use super::poller::{JobPoller, TerminalState};
use super::request::{ProcessingType, SubmissionRequest};
use crate::metrics::time_service_call;
use crate::services::{EtlResult, EtlService, FileStorage, JobHandle, ProcessRequest};
use crate::status::BusyGuard;

pub struct EtlDriver {
    storage: Arc<dyn FileStorage>,
    etl: Arc<dyn EtlService>,
    poller: JobPoller,
    defaults: EtlDefaults,
}

impl EtlDriver {
    pub fn new(
        storage: Arc<dyn FileStorage>,
        etl: Arc<dyn EtlService>,
        poller: JobPoller,
        defaults: EtlDefaults,
    ) -> Self {
        Self {
            storage,
            etl,
            poller,
            defaults,
        }
    }

    /// Processing language for the job: the source language when
    /// translating, otherwise the configured default.
    fn job_language(&self, request: &SubmissionRequest) -> String {
        match (request.processing_type(), request.source_language()) {
            (ProcessingType::Translate, Some(source)) => source.to_string(),
            _ => self.defaults.default_language.clone(),
        }
    }

    /// Upload the file and submit the processing job.
    pub async fn submit(
        &self,
        request: &SubmissionRequest,
        guard: &BusyGuard,
    ) -> Result<JobHandle, PipelineError> {
        let file = request.file();

        guard.update(25, "Uploading file to file organizer...");
        let receipt = time_service_call(self.storage.name(), "upload", self.storage.upload(file))
            .await
            .map_err(PipelineError::upload)?;
        info!(file_id = %receipt.file_id, filename = %file.filename, "File uploaded");

        guard.update(50, "Starting ETL processing...");
        let process = ProcessRequest {
            file_id: receipt.file_id,
            language: self.job_language(request),
        };
        let handle = time_service_call(self.etl.name(), "submit", self.etl.submit(&process))
            .await
            .map_err(PipelineError::submit)?;
        info!(job_id = %handle.job_id, language = %process.language, "ETL job submitted");

        Ok(handle)
    }

    /// Submit and poll to completion.
    pub async fn run(
        &self,
        request: &SubmissionRequest,
        guard: &BusyGuard,
        cancel: &CancelToken,
    ) -> Result<EtlResult, PipelineError> {
        let handle = self.submit(request, guard).await?;

        let report = self
            .poller
            .poll(&handle.job_id, guard, cancel)
            .await
            .map_err(|e| PipelineError::ResultFetchFailed {
                message: e.to_string(),
            })?;

        match report.state {
            TerminalState::Completed(result) => Ok(result),
            TerminalState::Failed { message } => Err(PipelineError::JobFailed { message }),
            TerminalState::TimedOut => Err(PipelineError::Timeout {
                attempts: report.attempts,
            }),
            TerminalState::Cancelled => Err(PipelineError::Cancelled),
        }
    }
}
